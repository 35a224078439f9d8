use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use quiz_core::model::{Outcome, QuestionId};

use super::capability::ProctoringSignal;
use super::controller::{QuizSession, TickOutcome, ViolationOutcome, ViolationWarning};
use super::keys::KeyChord;
use super::progress::SessionProgress;
use crate::error::SessionError;

const TICK: Duration = Duration::from_secs(1);

/// Discrete host input delivered to a running attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Select { question_id: QuestionId, option: usize },
    SelectCurrent(usize),
    Advance(isize),
    GoTo(usize),
    Signal(ProctoringSignal),
    Key(KeyChord),
    RestorePresentation,
    Submit,
    Exit,
}

/// Notifications published while an attempt runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Progress(SessionProgress),
    Warning(ViolationWarning),
    /// A command was refused; the attempt continues unchanged.
    Rejected(String),
    Ended(Outcome),
}

/// Host-side event loop for a started attempt.
///
/// Owns the one-second countdown and feeds ticks and commands to the
/// controller one at a time. Returns once the attempt is terminated; the
/// countdown is dropped with it.
pub struct SessionRunner {
    updates: mpsc::UnboundedSender<SessionUpdate>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(updates: mpsc::UnboundedSender<SessionUpdate>) -> Self {
        Self { updates }
    }

    /// Drive `session` until it terminates and return its outcome.
    ///
    /// A closed command channel leaves the countdown running until expiry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperationForState` if `session` has not
    /// been started.
    pub async fn run(
        &self,
        session: &mut QuizSession,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> Result<Outcome, SessionError> {
        let mut countdown = time::interval_at(Instant::now() + TICK, TICK);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        self.publish(SessionUpdate::Progress(session.progress()));

        loop {
            if let Some(outcome) = session.outcome() {
                self.publish(SessionUpdate::Ended(outcome));
                return Ok(outcome);
            }

            tokio::select! {
                _ = countdown.tick() => {
                    if let TickOutcome::Running { .. } = session.tick()? {
                        self.publish(SessionUpdate::Progress(session.progress()));
                    }
                }
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.apply(session, command)?,
                    None => {
                        log::debug!("command channel closed; countdown continues");
                        commands_open = false;
                    }
                },
            }
        }
    }

    fn apply(
        &self,
        session: &mut QuizSession,
        command: SessionCommand,
    ) -> Result<(), SessionError> {
        let applied = match command {
            SessionCommand::Select {
                question_id,
                option,
            } => session.select_answer(question_id, option).map(drop),
            SessionCommand::SelectCurrent(option) => session.select_current(option).map(drop),
            SessionCommand::Advance(delta) => session.advance(delta).map(drop),
            SessionCommand::GoTo(index) => session.go_to(index).map(drop),
            SessionCommand::Signal(signal) => session
                .report_signal(signal)
                .map(|outcome| self.publish_violation(outcome)),
            SessionCommand::Key(chord) => session
                .report_key(&chord)
                .map(|outcome| outcome.map_or((), |o| self.publish_violation(o))),
            SessionCommand::RestorePresentation => session.restore_presentation(),
            SessionCommand::Submit => session.submit().map(drop),
            SessionCommand::Exit => session.exit().map(drop),
        };

        match applied {
            Ok(()) => {
                if !session.is_terminated() {
                    self.publish(SessionUpdate::Progress(session.progress()));
                }
                Ok(())
            }
            Err(
                err @ (SessionError::OptionIndexOutOfRange { .. }
                | SessionError::UnknownQuestion(_)
                | SessionError::PresentationModeUnavailable { .. }),
            ) => {
                self.publish(SessionUpdate::Rejected(err.to_string()));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn publish_violation(&self, outcome: ViolationOutcome) {
        if let ViolationOutcome::Warning(warning) = outcome {
            self.publish(SessionUpdate::Warning(warning));
        }
    }

    fn publish(&self, update: SessionUpdate) {
        // A host that stopped listening does not stop the attempt.
        let _ = self.updates.send(update);
    }
}
