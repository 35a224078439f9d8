use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("option {0} is empty")]
    EmptyOption(usize),

    #[error("correct option {index} is out of range for {option_count} options")]
    CorrectOptionOutOfRange { index: usize, option_count: usize },
}

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
    #[serde(default)]
    explanation: Option<String>,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Self::new(
            raw.id,
            raw.prompt,
            raw.options,
            raw.correct_option,
            raw.explanation,
        )
    }
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or any option is blank, fewer than
    /// two options are given, or `correct_option` does not index an option.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        if let Some(blank) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption(blank));
        }
        if correct_option >= options.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                index: correct_option,
                option_count: options.len(),
            });
        }

        let explanation = explanation.filter(|e| !e.trim().is_empty());

        Ok(Self {
            id,
            prompt,
            options,
            correct_option,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option
    }
}
