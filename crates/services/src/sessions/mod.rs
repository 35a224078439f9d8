mod capability;
mod controller;
mod keys;
mod progress;
mod runner;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use capability::{PresentationError, PresentationMode, ProctoringSignal};
pub use controller::{QuizSession, SessionState, TickOutcome, ViolationOutcome, ViolationWarning};
pub use keys::KeyChord;
pub use progress::{SessionProgress, TimeUrgency, TimerView};
pub use runner::{SessionCommand, SessionRunner, SessionUpdate};
pub use workflow::{QuizSessionService, SessionEnd};
