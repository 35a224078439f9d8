use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId, QuizResult, ResultId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid fixture: {0}")]
    InvalidFixture(#[from] quiz_core::Error),
}

/// Read-only quiz content provider.
///
/// Quizzes are immutable once loaded, so lookups hand out shared `Arc<Quiz>`
/// handles instead of copies.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: QuizId) -> Result<Arc<Quiz>, StorageError>;

    /// List every quiz in id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<Arc<Quiz>>, StorageError>;
}

/// Results sink for finished attempts.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Record a scored attempt and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &QuizResult) -> Result<ResultId, StorageError>;

    /// Fetch a recorded result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_result(&self, id: ResultId) -> Result<QuizResult, StorageError>;

    /// Results for one quiz, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_results(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<(ResultId, QuizResult)>, StorageError>;
}

/// In-memory catalog and results store used by the app and tests.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<BTreeMap<QuizId, Arc<Quiz>>>>,
    results: Arc<Mutex<BTreeMap<ResultId, QuizResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-loaded with the given quizzes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if two quizzes share an id.
    pub fn with_quizzes(quizzes: impl IntoIterator<Item = Quiz>) -> Result<Self, StorageError> {
        let repo = Self::new();
        for quiz in quizzes {
            repo.insert_quiz(quiz)?;
        }
        Ok(repo)
    }

    /// Add a quiz to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is already taken.
    pub fn insert_quiz(&self, quiz: Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&quiz.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(quiz.id(), Arc::new(quiz));
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn get_quiz(&self, id: QuizId) -> Result<Arc<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_quizzes(&self) -> Result<Vec<Arc<Quiz>>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &QuizResult) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = guard.keys().next_back().map_or(1, |id| id.value() + 1);
        let id = ResultId::new(next);
        guard.insert(id, result.clone());
        Ok(id)
    }

    async fn get_result(&self, id: ResultId) -> Result<QuizResult, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_results(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<(ResultId, QuizResult)>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|(_, r)| r.quiz_id() == quiz_id)
            .map(|(id, r)| (*id, r.clone()))
            .collect())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self { quizzes, results }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// In-memory storage seeded with the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the fixtures fail validation or collide.
    pub fn sample() -> Result<Self, StorageError> {
        let quizzes = crate::fixtures::sample_catalog()?;
        Ok(Self::from_repository(InMemoryRepository::with_quizzes(quizzes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptId, Outcome, Question, QuestionId, QuizDraft, QuizError};
    use quiz_core::time::fixed_now;

    fn build_quiz(id: u64) -> Quiz {
        let mut draft = QuizDraft::new(QuizId::new(id), format!("Quiz {id}"), 5);
        draft.questions = vec![
            Question::new(QuestionId::new(1), "Q", vec!["a".into(), "b".into()], 0, None)
                .unwrap(),
        ];
        draft.validate().unwrap()
    }

    fn build_result(quiz_id: QuizId) -> QuizResult {
        QuizResult::new(
            quiz_id,
            AttemptId::generate(),
            Outcome::UserSubmitted,
            Vec::new(),
            None,
            fixed_now(),
            fixed_now(),
        )
    }

    #[tokio::test]
    async fn shares_quiz_handles() {
        let repo = InMemoryRepository::with_quizzes([build_quiz(1), build_quiz(2)]).unwrap();
        let a = repo.get_quiz(QuizId::new(1)).await.unwrap();
        let b = repo.get_quiz(QuizId::new(1)).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(repo.list_quizzes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_quiz_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.get_quiz(QuizId::new(9)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn fixture_validation_errors_keep_their_cause() {
        let err = StorageError::from(quiz_core::Error::from(QuizError::NoQuestions));
        assert!(matches!(err, StorageError::InvalidFixture(_)));
        assert_eq!(
            err.to_string(),
            "invalid fixture: quiz must contain at least one question"
        );
    }

    #[test]
    fn duplicate_quiz_ids_conflict() {
        let err = InMemoryRepository::with_quizzes([build_quiz(1), build_quiz(1)]).err();
        assert!(matches!(err, Some(StorageError::Conflict)));
    }

    #[tokio::test]
    async fn results_get_sequential_ids_and_filter_by_quiz() {
        let repo = InMemoryRepository::new();
        let first = repo.append_result(&build_result(QuizId::new(1))).await.unwrap();
        let second = repo.append_result(&build_result(QuizId::new(2))).await.unwrap();
        let third = repo.append_result(&build_result(QuizId::new(1))).await.unwrap();
        assert_eq!(first, ResultId::new(1));
        assert_eq!(second, ResultId::new(2));
        assert_eq!(third, ResultId::new(3));

        let for_quiz = repo.list_results(QuizId::new(1)).await.unwrap();
        let ids: Vec<_> = for_quiz.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![first, third]);
    }
}
