use std::sync::Arc;

use quiz_core::model::{QuizId, QuizResult, ResultId, SessionPolicy};
use storage::{QuizRepository, ResultRepository};

use super::capability::PresentationMode;
use super::controller::{QuizSession, SessionState};
use crate::Clock;
use crate::error::SessionError;

/// What happened to an attempt once it was handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Scored and stored; the host should navigate to the results view.
    Recorded {
        result_id: ResultId,
        result: QuizResult,
    },
    /// Aborted by the user; nothing was scored or stored.
    Discarded,
}

/// Opens attempts against the quiz catalog and hands finished ones to the
/// results sink.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    policy: SessionPolicy,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRepository>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            policy: SessionPolicy::default(),
            quizzes,
            results,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Load a quiz and create a not-yet-started attempt for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the quiz cannot be loaded.
    pub async fn open(
        &self,
        quiz_id: QuizId,
        presentation: Box<dyn PresentationMode>,
    ) -> Result<QuizSession, SessionError> {
        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        log::debug!("opening attempt on quiz {quiz_id} ({})", quiz.title());
        Ok(QuizSession::new(quiz, self.policy, presentation, self.clock))
    }

    /// Hand a finished attempt to the results sink.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` if the attempt is still
    /// running, or `SessionError::Storage` if the result cannot be stored.
    pub async fn finish(&self, session: &QuizSession) -> Result<SessionEnd, SessionError> {
        match session.state() {
            SessionState::Terminated(outcome) if !outcome.is_scored() => {
                log::info!("attempt {} discarded", session.attempt_id());
                Ok(SessionEnd::Discarded)
            }
            _ => {
                let result = session.score()?;
                let result_id = self.results.append_result(&result).await?;
                log::info!(
                    "attempt {} recorded as result {result_id}: {}/{} ({})",
                    session.attempt_id(),
                    result.correct(),
                    result.total(),
                    result.outcome()
                );
                Ok(SessionEnd::Recorded { result_id, result })
            }
        }
    }
}
