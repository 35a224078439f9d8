use std::sync::Arc;

use quiz_core::model::{Outcome, QuizId, QuizResult, ResultId};
use storage::ResultRepository;

use crate::error::ResultsError;

/// Aggregate figures for one quiz, for the analytics view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizStats {
    pub attempts: usize,
    pub average_percentage: u32,
    pub best_percentage: u32,
    pub terminated: usize,
    pub timed_out: usize,
}

#[derive(Clone)]
pub struct ResultsService {
    results: Arc<dyn ResultRepository>,
}

impl ResultsService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the result is missing or unreadable.
    pub async fn result(&self, id: ResultId) -> Result<QuizResult, ResultsError> {
        Ok(self.results.get_result(id).await?)
    }

    /// # Errors
    ///
    /// Returns `ResultsError::Storage` on read failures.
    pub async fn history(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<(ResultId, QuizResult)>, ResultsError> {
        Ok(self.results.list_results(quiz_id).await?)
    }

    /// Summarize every recorded attempt at a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` on read failures.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn stats(&self, quiz_id: QuizId) -> Result<QuizStats, ResultsError> {
        let history = self.results.list_results(quiz_id).await?;
        if history.is_empty() {
            return Ok(QuizStats::default());
        }

        let percentages: Vec<u32> = history.iter().map(|(_, r)| r.percentage()).collect();
        let sum: u64 = percentages.iter().map(|p| u64::from(*p)).sum();
        let attempts = history.len();
        let count_outcome =
            |outcome: Outcome| history.iter().filter(|(_, r)| r.outcome() == outcome).count();

        Ok(QuizStats {
            attempts,
            average_percentage: (sum / attempts as u64) as u32,
            best_percentage: percentages.iter().copied().max().unwrap_or(0),
            terminated: count_outcome(Outcome::ProctoringViolation),
            timed_out: count_outcome(Outcome::TimeExpired),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptId, QuestionId, QuestionReview};
    use quiz_core::time::fixed_now;
    use storage::InMemoryRepository;

    fn result(quiz_id: u64, outcome: Outcome, correct: usize, total: usize) -> QuizResult {
        let reviews = (0..total)
            .map(|i| QuestionReview {
                question_id: QuestionId::new(i as u64 + 1),
                prompt: "Q".into(),
                selected: Some(0),
                correct_option: 0,
                is_correct: i < correct,
                explanation: None,
            })
            .collect();
        QuizResult::new(
            QuizId::new(quiz_id),
            AttemptId::generate(),
            outcome,
            reviews,
            None,
            fixed_now(),
            fixed_now(),
        )
    }

    #[tokio::test]
    async fn stats_aggregate_per_quiz() {
        let repo = InMemoryRepository::new();
        repo.append_result(&result(1, Outcome::UserSubmitted, 4, 5)).await.unwrap();
        repo.append_result(&result(1, Outcome::TimeExpired, 1, 5)).await.unwrap();
        repo.append_result(&result(1, Outcome::ProctoringViolation, 0, 5)).await.unwrap();
        repo.append_result(&result(2, Outcome::UserSubmitted, 2, 2)).await.unwrap();

        let service = ResultsService::new(Arc::new(repo));
        let stats = service.stats(QuizId::new(1)).await.unwrap();
        assert_eq!(
            stats,
            QuizStats {
                attempts: 3,
                average_percentage: 33,
                best_percentage: 80,
                terminated: 1,
                timed_out: 1,
            }
        );
        assert_eq!(service.history(QuizId::new(2)).await.unwrap().len(), 1);
        assert_eq!(service.stats(QuizId::new(3)).await.unwrap(), QuizStats::default());
    }
}
