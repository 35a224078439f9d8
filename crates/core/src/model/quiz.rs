use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz must contain at least one question")]
    NoQuestions,

    #[error("quiz duration must be at least one minute")]
    ZeroDuration,

    #[error("duplicate question id {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("rating must be between 0 and 5")]
    InvalidRating,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(QuizError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// Catalog popularity figures shown on listings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Popularity {
    pub attempts: u32,
    pub rating: f32,
}

/// Unvalidated quiz input. Call [`QuizDraft::validate`] to obtain a [`Quiz`].
///
/// This is also the wire shape of a `Quiz`, so deserialized quizzes go
/// through the same validation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizDraft {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub popularity: Popularity,
}

impl QuizDraft {
    #[must_use]
    pub fn new(id: QuizId, title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            difficulty: None,
            duration_minutes,
            questions: Vec::new(),
            tags: Vec::new(),
            popularity: Popularity::default(),
        }
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the title or category is blank, there are no
    /// questions, the duration is zero, question ids repeat, or the rating is
    /// outside `0..=5`.
    pub fn validate(self) -> Result<Quiz, QuizError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        let category = if self.category.trim().is_empty() {
            "General".to_string()
        } else {
            self.category.trim().to_string()
        };
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if self.duration_minutes == 0 {
            return Err(QuizError::ZeroDuration);
        }
        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestionId(question.id()));
            }
        }
        if !(0.0..=5.0).contains(&self.popularity.rating) {
            return Err(QuizError::InvalidRating);
        }

        let tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Quiz {
            id: self.id,
            title,
            description: self.description.trim().to_string(),
            category,
            difficulty: self.difficulty.unwrap_or(Difficulty::Medium),
            duration_minutes: self.duration_minutes,
            questions: self.questions,
            tags,
            popularity: self.popularity,
        })
    }
}

/// An ordered, immutable set of questions with a fixed time limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizDraft")]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    category: String,
    difficulty: Difficulty,
    duration_minutes: u32,
    questions: Vec<Question>,
    tags: Vec<String>,
    popularity: Popularity,
}

impl Quiz {
    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Time limit expressed in countdown ticks (seconds).
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn popularity(&self) -> Popularity {
        self.popularity
    }
}

impl TryFrom<QuizDraft> for Quiz {
    type Error = QuizError;

    fn try_from(draft: QuizDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            vec!["yes".into(), "no".into()],
            0,
            None,
        )
        .unwrap()
    }

    fn draft() -> QuizDraft {
        let mut draft = QuizDraft::new(QuizId::new(7), "  Olympic Sports Trivia ", 10);
        draft.category = "Sports".into();
        draft.difficulty = Some(Difficulty::Easy);
        draft.questions = vec![question(1), question(2)];
        draft.tags = vec![" Olympics ".into(), String::new()];
        draft
    }

    #[test]
    fn validate_normalizes_fields() {
        let quiz = draft().validate().unwrap();
        assert_eq!(quiz.title(), "Olympic Sports Trivia");
        assert_eq!(quiz.tags(), ["olympics".to_string()]);
        assert_eq!(quiz.duration_secs(), 600);
        assert_eq!(quiz.question_count(), 2);
        assert!(quiz.question(QuestionId::new(2)).is_some());
    }

    #[test]
    fn validate_rejects_empty_quiz() {
        let mut d = draft();
        d.questions.clear();
        assert_eq!(d.validate().unwrap_err(), QuizError::NoQuestions);
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let mut d = draft();
        d.duration_minutes = 0;
        assert_eq!(d.validate().unwrap_err(), QuizError::ZeroDuration);
    }

    #[test]
    fn validate_rejects_duplicate_question_ids() {
        let mut d = draft();
        d.questions.push(question(1));
        assert_eq!(
            d.validate().unwrap_err(),
            QuizError::DuplicateQuestionId(QuestionId::new(1))
        );
    }

    #[test]
    fn blank_category_defaults_to_general() {
        let mut d = draft();
        d.category = " ".into();
        assert_eq!(d.validate().unwrap().category(), "General");
    }

    #[test]
    fn deserialized_quiz_is_validated() {
        let empty = r#"{"id":9,"title":"Empty","duration_minutes":0,"questions":[],
            "popularity":{"attempts":1,"rating":9.0}}"#;
        let err = serde_json::from_str::<Quiz>(empty).unwrap_err();
        assert!(err.to_string().contains("at least one question"));

        let rated = r#"{"id":9,"title":"Rated","duration_minutes":5,
            "questions":[{"id":1,"prompt":"Q","options":["a","b"],"correct_option":0}],
            "popularity":{"attempts":1,"rating":9.0}}"#;
        let err = serde_json::from_str::<Quiz>(rated).unwrap_err();
        assert!(err.to_string().contains("rating"));
    }

    #[test]
    fn quiz_survives_json_round_trip() {
        let quiz = draft().validate().unwrap();
        let json = serde_json::to_string(&quiz).unwrap();
        assert_eq!(serde_json::from_str::<Quiz>(&json).unwrap(), quiz);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
