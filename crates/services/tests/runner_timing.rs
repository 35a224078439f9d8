use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use quiz_core::model::{Outcome, QuizId};
use quiz_core::time::fixed_clock;
use services::{
    KeyChord, PresentationError, PresentationMode, ProctoringSignal, QuizSessionService,
    SessionCommand, SessionError, SessionRunner, SessionUpdate,
};
use storage::Storage;
use tokio::sync::mpsc;

#[derive(Clone, Default)]
struct CountingPresentation {
    released: Arc<AtomicU32>,
}

impl PresentationMode for CountingPresentation {
    fn acquire(&mut self) -> Result<(), PresentationError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), PresentationError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn sessions() -> QuizSessionService {
    let storage = Storage::sample().unwrap();
    QuizSessionService::new(fixed_clock(), storage.quizzes, storage.results)
}

fn drain(updates: &mut mpsc::UnboundedReceiver<SessionUpdate>) -> Vec<SessionUpdate> {
    let mut seen = Vec::new();
    while let Ok(update) = updates.try_recv() {
        seen.push(update);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_to_expiry_without_input() {
    let presentation = CountingPresentation::default();
    let mut session = sessions()
        .open(QuizId::new(5), Box::new(presentation.clone()))
        .await
        .unwrap();
    session.start().unwrap();

    let (updates_tx, mut updates) = mpsc::unbounded_channel();
    let (_commands_tx, commands) = mpsc::channel(8);
    let started = tokio::time::Instant::now();

    let outcome = SessionRunner::new(updates_tx)
        .run(&mut session, commands)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::TimeExpired);
    assert_eq!(session.remaining_secs(), 0);
    assert_eq!(started.elapsed(), Duration::from_secs(10 * 60));
    assert_eq!(presentation.released.load(Ordering::SeqCst), 1);
    assert_eq!(
        drain(&mut updates).last(),
        Some(&SessionUpdate::Ended(Outcome::TimeExpired))
    );
}

#[tokio::test(start_paused = true)]
async fn submit_stops_the_countdown() {
    let mut session = sessions()
        .open(QuizId::new(1), Box::new(CountingPresentation::default()))
        .await
        .unwrap();
    session.start().unwrap();

    let (updates_tx, _updates) = mpsc::unbounded_channel();
    let (commands_tx, commands) = mpsc::channel(8);
    commands_tx.send(SessionCommand::SelectCurrent(1)).await.unwrap();
    commands_tx.send(SessionCommand::Advance(1)).await.unwrap();
    commands_tx.send(SessionCommand::SelectCurrent(1)).await.unwrap();
    commands_tx.send(SessionCommand::Submit).await.unwrap();

    let outcome = SessionRunner::new(updates_tx)
        .run(&mut session, commands)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::UserSubmitted);
    assert_eq!(session.remaining_secs(), 15 * 60);
    let result = session.score().unwrap();
    assert_eq!(result.correct(), 2);
}

#[tokio::test(start_paused = true)]
async fn warnings_and_rejections_are_published() {
    let mut session = sessions()
        .open(QuizId::new(1), Box::new(CountingPresentation::default()))
        .await
        .unwrap();
    session.start().unwrap();

    let (updates_tx, mut updates) = mpsc::unbounded_channel();
    let (commands_tx, commands) = mpsc::channel(8);
    commands_tx
        .send(SessionCommand::Signal(ProctoringSignal::FocusLost))
        .await
        .unwrap();
    commands_tx.send(SessionCommand::SelectCurrent(9)).await.unwrap();
    commands_tx
        .send(SessionCommand::Key(KeyChord::new("F12", false, false)))
        .await
        .unwrap();
    commands_tx
        .send(SessionCommand::Signal(ProctoringSignal::PresentationModeLost))
        .await
        .unwrap();

    let outcome = SessionRunner::new(updates_tx)
        .run(&mut session, commands)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::ProctoringViolation);
    assert_eq!(session.violation_reason(), Some("Exited fullscreen mode"));

    let seen = drain(&mut updates);
    let warnings = seen
        .iter()
        .filter(|u| matches!(u, SessionUpdate::Warning(_)))
        .count();
    let rejections = seen
        .iter()
        .filter(|u| matches!(u, SessionUpdate::Rejected(_)))
        .count();
    assert_eq!(warnings, 2);
    assert_eq!(rejections, 1);
}

#[tokio::test(start_paused = true)]
async fn runner_refuses_unstarted_sessions() {
    let mut session = sessions()
        .open(QuizId::new(1), Box::new(CountingPresentation::default()))
        .await
        .unwrap();

    let (updates_tx, _updates) = mpsc::unbounded_channel();
    let (commands_tx, commands) = mpsc::channel(1);
    commands_tx.send(SessionCommand::Submit).await.unwrap();

    let err = SessionRunner::new(updates_tx)
        .run(&mut session, commands)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidOperationForState { .. }));
}
