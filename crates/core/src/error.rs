use thiserror::Error;

use crate::model::{PolicyError, QuestionError, QuizError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}
