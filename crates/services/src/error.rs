//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionId, QuizError};
use storage::StorageError;

use crate::sessions::SessionState;

/// Errors emitted by the quiz session controller and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// Presentation mode could not be acquired. `retries_left` is `None`
    /// when the caller may keep retrying without limit.
    #[error("exclusive presentation mode is unavailable (attempt {attempts})")]
    PresentationModeUnavailable {
        attempts: u32,
        retries_left: Option<u32>,
    },
    #[error("{operation} is not valid while the session is {state}")]
    InvalidOperationForState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("option {index} is out of range for question {question_id} ({option_count} options)")]
    OptionIndexOutOfRange {
        question_id: QuestionId,
        index: usize,
        option_count: usize,
    },
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True when the caller can sensibly retry the same operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::PresentationModeUnavailable { retries_left, .. } => {
                retries_left.is_none_or(|left| left > 0)
            }
            _ => false,
        }
    }
}

/// Errors emitted by `QuizCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
