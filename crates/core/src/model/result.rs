use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, QuestionId, QuizId};
use crate::model::outcome::Outcome;
use crate::time::elapsed_secs;

/// Correctness of a single question within a scored attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub selected: Option<usize>,
    pub correct_option: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Grade band for a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    Great,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => ScoreBand::Excellent,
            80..=89 => ScoreBand::Great,
            70..=79 => ScoreBand::Good,
            60..=69 => ScoreBand::Fair,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent!",
            ScoreBand::Great => "Great!",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Immutable outcome of a scored attempt, handed to the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    quiz_id: QuizId,
    attempt_id: AttemptId,
    outcome: Outcome,
    correct: usize,
    total: usize,
    reviews: Vec<QuestionReview>,
    violation_reason: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Assemble a result; the correct count is derived from `reviews`.
    #[must_use]
    pub fn new(
        quiz_id: QuizId,
        attempt_id: AttemptId,
        outcome: Outcome,
        reviews: Vec<QuestionReview>,
        violation_reason: Option<String>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let correct = reviews.iter().filter(|r| r.is_correct).count();
        Self {
            quiz_id,
            attempt_id,
            outcome,
            correct,
            total: reviews.len(),
            reviews,
            violation_reason,
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn reviews(&self) -> &[QuestionReview] {
        &self.reviews
    }

    /// Per-question correctness in quiz order.
    #[must_use]
    pub fn correctness(&self) -> Vec<bool> {
        self.reviews.iter().map(|r| r.is_correct).collect()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.reviews.iter().filter(|r| r.selected.is_some()).count()
    }

    #[must_use]
    pub fn violation_reason(&self) -> Option<&str> {
        self.violation_reason.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        elapsed_secs(self.started_at, self.completed_at)
    }

    /// Rounded percentage of correct answers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct * 100 + self.total / 2) / self.total) as u32
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage())
    }

    /// Badge text for the results view.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self.outcome {
            Outcome::ProctoringViolation => "Terminated",
            Outcome::TimeExpired => "Time Up",
            _ => self.band().label(),
        }
    }

    #[must_use]
    pub fn certificate_eligible(&self) -> bool {
        self.outcome != Outcome::ProctoringViolation
    }
}
