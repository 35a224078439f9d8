use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{
    AttemptId, Outcome, Question, QuestionId, QuestionReview, Quiz, QuizResult, SessionPolicy,
};

use super::capability::{PresentationMode, ProctoringSignal};
use super::keys::KeyChord;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an attempt. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Terminated(Outcome),
}

impl SessionState {
    #[must_use]
    pub fn is_terminated(self) -> bool {
        matches!(self, SessionState::Terminated(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NotStarted => f.write_str("not started"),
            SessionState::InProgress => f.write_str("in progress"),
            SessionState::Terminated(outcome) => write!(f, "terminated ({outcome})"),
        }
    }
}

/// Result of delivering one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    Expired,
    /// The attempt had already ended.
    Ignored,
}

/// Warning surfaced after a violation that did not end the attempt.
///
/// The host should offer the user a way back into presentation mode
/// (see [`QuizSession::restore_presentation`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationWarning {
    pub count: u32,
    pub max: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationOutcome {
    Warning(ViolationWarning),
    Terminated { count: u32, reason: String },
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Controller for a single quiz attempt.
///
/// Mutated only by discrete host events (ticks, user input, proctoring
/// signals) delivered one at a time. Calls after termination are accepted and
/// ignored so late events never change the outcome.
pub struct QuizSession {
    attempt_id: AttemptId,
    quiz: Arc<Quiz>,
    policy: SessionPolicy,
    clock: Clock,
    presentation: Box<dyn PresentationMode>,
    state: SessionState,
    current: usize,
    answers: HashMap<QuestionId, usize>,
    remaining_secs: u32,
    violations: u32,
    violation_reason: Option<String>,
    start_attempts: u32,
    restore_attempts: u32,
    presentation_active: bool,
    remediation_pending: bool,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(
        quiz: Arc<Quiz>,
        policy: SessionPolicy,
        presentation: Box<dyn PresentationMode>,
        clock: Clock,
    ) -> Self {
        let remaining_secs = quiz.duration_secs();
        Self {
            attempt_id: AttemptId::generate(),
            quiz,
            policy,
            clock,
            presentation,
            state: SessionState::NotStarted,
            current: 0,
            answers: HashMap::new(),
            remaining_secs,
            violations: 0,
            violation_reason: None,
            start_attempts: 0,
            restore_attempts: 0,
            presentation_active: false,
            remediation_pending: false,
            started_at: None,
            completed_at: None,
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    #[must_use]
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.quiz.questions()[self.current]
    }

    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn violations(&self) -> u32 {
        self.violations
    }

    /// The reason recorded for the violation that ended the attempt.
    #[must_use]
    pub fn violation_reason(&self) -> Option<&str> {
        self.violation_reason.as_deref()
    }

    /// True after a warning until presentation mode is restored.
    #[must_use]
    pub fn remediation_pending(&self) -> bool {
        self.remediation_pending
    }

    #[must_use]
    pub fn presentation_active(&self) -> bool {
        self.presentation_active
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.current,
            total: self.quiz.question_count(),
            answered: self.answers.len(),
            remaining_secs: self.remaining_secs,
            violations: self.violations,
            max_violations: self.policy.max_violations(),
            state: self.state,
        }
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────────────

    /// Acquire presentation mode and begin the attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PresentationModeUnavailable` if the host refuses
    /// presentation mode; the state stays `NotStarted` and the caller may retry
    /// until the policy's start attempts are used up.
    /// Returns `SessionError::InvalidOperationForState` if already started.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(self.invalid("start"));
        }

        let max = self.policy.max_start_attempts();
        if self.start_attempts >= max {
            return Err(SessionError::PresentationModeUnavailable {
                attempts: self.start_attempts,
                retries_left: Some(0),
            });
        }

        self.start_attempts += 1;
        if let Err(err) = self.presentation.acquire() {
            log::warn!(
                "attempt {}: presentation mode unavailable ({}/{max}): {err}",
                self.attempt_id,
                self.start_attempts
            );
            return Err(SessionError::PresentationModeUnavailable {
                attempts: self.start_attempts,
                retries_left: Some(max - self.start_attempts),
            });
        }

        self.presentation_active = true;
        self.state = SessionState::InProgress;
        self.remaining_secs = self.quiz.duration_secs();
        self.violations = 0;
        self.started_at = Some(self.clock.now());
        log::info!(
            "attempt {} started on quiz {} ({} questions, {}s)",
            self.attempt_id,
            self.quiz.id(),
            self.quiz.question_count(),
            self.remaining_secs
        );
        Ok(())
    }

    /// Record (or overwrite) the selected option for a question.
    ///
    /// Returns `Ok(false)` without recording once the attempt has ended.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`,
    /// `SessionError::UnknownQuestion` for a foreign question id, and
    /// `SessionError::OptionIndexOutOfRange` for an index past the options.
    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        option: usize,
    ) -> Result<bool, SessionError> {
        if !self.accepts("select_answer")? {
            return Ok(false);
        }

        let question = self
            .quiz
            .question(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        if option >= question.option_count() {
            return Err(SessionError::OptionIndexOutOfRange {
                question_id,
                index: option,
                option_count: question.option_count(),
            });
        }

        self.answers.insert(question_id, option);
        Ok(true)
    }

    /// [`select_answer`](Self::select_answer) for the question on screen.
    ///
    /// # Errors
    ///
    /// Same as `select_answer`.
    pub fn select_current(&mut self, option: usize) -> Result<bool, SessionError> {
        let question_id = self.current_question().id();
        self.select_answer(question_id, option)
    }

    /// Move the current question by `delta`, clamped to the quiz bounds.
    ///
    /// Returns the resulting index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn advance(&mut self, delta: isize) -> Result<usize, SessionError> {
        if !self.accepts("advance")? {
            return Ok(self.current);
        }
        let last = self.last_index();
        self.current = if delta < 0 {
            self.current.saturating_sub(delta.unsigned_abs())
        } else {
            self.current.saturating_add(delta.unsigned_abs()).min(last)
        };
        Ok(self.current)
    }

    /// Jump straight to a question, clamped to the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        if !self.accepts("go_to")? {
            return Ok(self.current);
        }
        self.current = index.min(self.last_index());
        Ok(self.current)
    }

    /// Deliver one second of countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        if !self.accepts("tick")? {
            return Ok(TickOutcome::Ignored);
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.terminate(Outcome::TimeExpired);
            return Ok(TickOutcome::Expired);
        }
        Ok(TickOutcome::Running {
            remaining_secs: self.remaining_secs,
        })
    }

    /// Count a proctoring violation.
    ///
    /// Reaching the policy maximum ends the attempt with
    /// `Outcome::ProctoringViolation`. Below the maximum the attempt continues
    /// and presentation mode must be restored; further violations keep
    /// counting whether or not it has been.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn report_violation(
        &mut self,
        reason: impl Into<String>,
    ) -> Result<ViolationOutcome, SessionError> {
        if !self.accepts("report_violation")? {
            return Ok(ViolationOutcome::Ignored);
        }

        let reason = reason.into();
        let max = self.policy.max_violations();
        self.violations += 1;
        log::warn!(
            "attempt {}: violation {}/{max}: {reason}",
            self.attempt_id,
            self.violations
        );

        if self.violations >= max {
            self.violation_reason = Some(reason.clone());
            self.terminate(Outcome::ProctoringViolation);
            return Ok(ViolationOutcome::Terminated {
                count: self.violations,
                reason,
            });
        }

        self.remediation_pending = true;
        Ok(ViolationOutcome::Warning(ViolationWarning {
            count: self.violations,
            max,
            reason,
        }))
    }

    /// Count a host proctoring signal as a violation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn report_signal(
        &mut self,
        signal: ProctoringSignal,
    ) -> Result<ViolationOutcome, SessionError> {
        if signal == ProctoringSignal::PresentationModeLost
            && self.state == SessionState::InProgress
        {
            self.presentation_active = false;
        }
        self.report_violation(signal.reason())
    }

    /// Screen a key press; restricted chords count as a violation.
    ///
    /// Returns `None` for keys that are allowed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn report_key(
        &mut self,
        chord: &KeyChord,
    ) -> Result<Option<ViolationOutcome>, SessionError> {
        if !chord.is_restricted() {
            return Ok(None);
        }
        self.report_signal(ProctoringSignal::RestrictedInput).map(Some)
    }

    /// Re-enter presentation mode after a warning.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PresentationModeUnavailable` if the host refuses;
    /// the user may keep retrying, and the pending remediation stays open.
    /// `attempts` counts refusals since the last successful restore.
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn restore_presentation(&mut self) -> Result<(), SessionError> {
        if !self.accepts("restore_presentation")? {
            return Ok(());
        }
        if self.presentation_active && !self.remediation_pending {
            return Ok(());
        }

        self.restore_attempts += 1;
        if let Err(err) = self.presentation.acquire() {
            log::warn!(
                "attempt {}: could not restore presentation mode (try {}): {err}",
                self.attempt_id,
                self.restore_attempts
            );
            return Err(SessionError::PresentationModeUnavailable {
                attempts: self.restore_attempts,
                retries_left: None,
            });
        }

        self.restore_attempts = 0;
        self.presentation_active = true;
        self.remediation_pending = false;
        Ok(())
    }

    /// End the attempt at the user's request; the attempt will be scored.
    ///
    /// Returns `Ok(false)` if the attempt had already ended.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn submit(&mut self) -> Result<bool, SessionError> {
        if !self.accepts("submit")? {
            return Ok(false);
        }
        self.terminate(Outcome::UserSubmitted);
        Ok(true)
    }

    /// Abandon the attempt. The caller should discard it without scoring.
    ///
    /// Returns `Ok(false)` if the attempt had already ended.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` before `start`.
    pub fn exit(&mut self) -> Result<bool, SessionError> {
        if !self.accepts("exit")? {
            return Ok(false);
        }
        self.terminate(Outcome::UserAborted);
        Ok(true)
    }

    /// Score a finished attempt. Unanswered questions count as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` unless the attempt
    /// ended by submission, timeout, or proctoring violation.
    pub fn score(&self) -> Result<QuizResult, SessionError> {
        let outcome = match self.state {
            SessionState::Terminated(outcome) if outcome.is_scored() => outcome,
            _ => return Err(self.invalid("score")),
        };

        let reviews = self
            .quiz
            .questions()
            .iter()
            .map(|question| {
                let selected = self.answer(question.id());
                QuestionReview {
                    question_id: question.id(),
                    prompt: question.prompt().to_string(),
                    selected,
                    correct_option: question.correct_option(),
                    is_correct: selected.is_some_and(|s| question.is_correct(s)),
                    explanation: question.explanation().map(str::to_string),
                }
            })
            .collect();

        let completed_at = self.completed_at.unwrap_or_else(|| self.clock.now());
        Ok(QuizResult::new(
            self.quiz.id(),
            self.attempt_id,
            outcome,
            reviews,
            self.violation_reason.clone(),
            self.started_at.unwrap_or(completed_at),
            completed_at,
        ))
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    /// `Ok(true)` while in progress, `Ok(false)` once terminated.
    fn accepts(&self, operation: &'static str) -> Result<bool, SessionError> {
        match self.state {
            SessionState::InProgress => Ok(true),
            SessionState::Terminated(_) => {
                log::debug!("attempt {}: ignoring late {operation}", self.attempt_id);
                Ok(false)
            }
            SessionState::NotStarted => Err(self.invalid(operation)),
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidOperationForState {
            operation,
            state: self.state,
        }
    }

    fn last_index(&self) -> usize {
        self.quiz.question_count().saturating_sub(1)
    }

    fn terminate(&mut self, outcome: Outcome) {
        if self.state.is_terminated() {
            return;
        }
        self.state = SessionState::Terminated(outcome);
        self.completed_at = Some(self.clock.now());
        self.remediation_pending = false;

        if self.presentation_active {
            if let Err(err) = self.presentation.release() {
                log::warn!(
                    "attempt {}: failed to release presentation mode: {err}",
                    self.attempt_id
                );
            }
            self.presentation_active = false;
        }

        log::info!(
            "attempt {} ended: {outcome} ({}/{} answered, {}s left, {} violations)",
            self.attempt_id,
            self.answers.len(),
            self.quiz.question_count(),
            self.remaining_secs,
            self.violations
        );
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("attempt_id", &self.attempt_id)
            .field("quiz_id", &self.quiz.id())
            .field("state", &self.state)
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("violations", &self.violations)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
