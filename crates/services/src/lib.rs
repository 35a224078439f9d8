#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod results_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{
    CatalogPage, CatalogQuery, CategorySummary, QuizCatalogService, QuizListing, SortOrder,
};
pub use error::{AppServicesError, CatalogError, ResultsError, SessionError};
pub use results_service::{QuizStats, ResultsService};
pub use sessions::{
    KeyChord, PresentationError, PresentationMode, ProctoringSignal, QuizSession,
    QuizSessionService, SessionCommand, SessionEnd, SessionProgress, SessionRunner, SessionState,
    SessionUpdate, TickOutcome, TimeUrgency, TimerView, ViolationOutcome, ViolationWarning,
};
