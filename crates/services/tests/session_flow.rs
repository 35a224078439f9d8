use std::sync::Arc;

use quiz_core::model::{Outcome, Question, QuestionId, QuizDraft, QuizId, SessionPolicy};
use quiz_core::time::fixed_now;
use services::{
    AppServices, Clock, PresentationError, PresentationMode, QuizSessionService, ResultsService, SessionEnd,
    SessionState, TickOutcome, ViolationOutcome,
};
use storage::{InMemoryRepository, ResultRepository, Storage};

struct AlwaysFullscreen;

impl PresentationMode for AlwaysFullscreen {
    fn acquire(&mut self) -> Result<(), PresentationError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), PresentationError> {
        Ok(())
    }
}

fn two_question_storage() -> Storage {
    let mut draft = QuizDraft::new(QuizId::new(10), "Two Questions", 1);
    draft.questions = vec![
        Question::new(
            QuestionId::new(1),
            "First?",
            vec!["a".into(), "b".into()],
            1,
            None,
        )
        .unwrap(),
        Question::new(
            QuestionId::new(2),
            "Second?",
            vec!["a".into(), "b".into()],
            0,
            None,
        )
        .unwrap(),
    ];
    let repo = InMemoryRepository::with_quizzes([draft.validate().unwrap()]).unwrap();
    Storage::from_repository(repo)
}

fn service(storage: &Storage) -> QuizSessionService {
    QuizSessionService::new(
        Clock::fixed(fixed_now()),
        Arc::clone(&storage.quizzes),
        Arc::clone(&storage.results),
    )
    .with_policy(SessionPolicy::new(3, 3).unwrap())
}

#[tokio::test]
async fn timed_out_attempt_is_scored_and_recorded() {
    let storage = two_question_storage();
    let svc = service(&storage);

    let mut session = svc.open(QuizId::new(10), Box::new(AlwaysFullscreen)).await.unwrap();
    session.start().unwrap();
    assert_eq!(session.state(), SessionState::InProgress);

    assert!(session.select_answer(QuestionId::new(1), 1).unwrap());
    let mut last = TickOutcome::Ignored;
    for _ in 0..60 {
        last = session.tick().unwrap();
    }
    assert_eq!(last, TickOutcome::Expired);
    assert_eq!(session.state(), SessionState::Terminated(Outcome::TimeExpired));
    assert_eq!(session.remaining_secs(), 0);

    let SessionEnd::Recorded { result_id, result } = svc.finish(&session).await.unwrap() else {
        panic!("timed-out attempts are recorded");
    };
    assert_eq!(result.correct(), 1);
    assert_eq!(result.total(), 2);
    assert_eq!(result.headline(), "Time Up");

    let results = ResultsService::new(Arc::clone(&storage.results));
    assert_eq!(results.result(result_id).await.unwrap(), result);
}

#[tokio::test]
async fn third_violation_terminates_and_freezes_answers() {
    let storage = two_question_storage();
    let svc = service(&storage);

    let mut session = svc.open(QuizId::new(10), Box::new(AlwaysFullscreen)).await.unwrap();
    session.start().unwrap();

    assert!(matches!(
        session.report_violation("focus-lost").unwrap(),
        ViolationOutcome::Warning(_)
    ));
    assert!(matches!(
        session.report_violation("focus-lost").unwrap(),
        ViolationOutcome::Warning(_)
    ));
    assert!(matches!(
        session.report_violation("focus-lost").unwrap(),
        ViolationOutcome::Terminated { count: 3, .. }
    ));
    assert_eq!(
        session.state(),
        SessionState::Terminated(Outcome::ProctoringViolation)
    );

    assert!(!session.select_answer(QuestionId::new(1), 1).unwrap());
    assert_eq!(session.answer(QuestionId::new(1)), None);

    let end = svc.finish(&session).await.unwrap();
    let SessionEnd::Recorded { result, .. } = end else {
        panic!("proctoring terminations are recorded");
    };
    assert_eq!(result.violation_reason(), Some("focus-lost"));
    assert!(!result.certificate_eligible());
}

#[tokio::test]
async fn perfect_submission_scores_every_question() {
    let storage = Storage::sample().unwrap();
    let svc = service(&storage);

    let mut session = svc.open(QuizId::new(1), Box::new(AlwaysFullscreen)).await.unwrap();
    session.start().unwrap();
    let answers: Vec<_> = session
        .quiz()
        .questions()
        .iter()
        .map(|q| (q.id(), q.correct_option()))
        .collect();
    for (question_id, option) in answers {
        session.select_answer(question_id, option).unwrap();
    }
    session.submit().unwrap();

    let SessionEnd::Recorded { result, .. } = svc.finish(&session).await.unwrap() else {
        panic!("submitted attempts are recorded");
    };
    assert_eq!(result.correct(), result.total());
    assert_eq!(result.headline(), "Excellent!");
}

#[tokio::test]
async fn aborted_attempt_is_discarded() {
    let storage = two_question_storage();
    let svc = service(&storage);

    let mut session = svc.open(QuizId::new(10), Box::new(AlwaysFullscreen)).await.unwrap();
    session.start().unwrap();
    session.select_answer(QuestionId::new(1), 1).unwrap();
    assert!(session.exit().unwrap());

    assert_eq!(svc.finish(&session).await.unwrap(), SessionEnd::Discarded);
    assert!(storage.results.list_results(QuizId::new(10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn running_attempt_cannot_be_finished() {
    let storage = two_question_storage();
    let svc = service(&storage);

    let mut session = svc.open(QuizId::new(10), Box::new(AlwaysFullscreen)).await.unwrap();
    session.start().unwrap();
    let err = svc.finish(&session).await.unwrap_err();
    assert!(matches!(
        err,
        services::SessionError::InvalidOperationForState { operation: "score", .. }
    ));
}

#[tokio::test]
async fn unknown_quiz_surfaces_storage_error() {
    let storage = two_question_storage();
    let err = service(&storage)
        .open(QuizId::new(404), Box::new(AlwaysFullscreen))
        .await
        .unwrap_err();
    assert!(matches!(err, services::SessionError::Storage(_)));
}

#[tokio::test]
async fn app_services_share_one_results_sink() {
    let storage = two_question_storage();
    let clock = Clock::fixed(fixed_now());
    let services = AppServices::new(&storage, clock, SessionPolicy::default());

    let mut session = services
        .sessions()
        .open(QuizId::new(10), Box::new(AlwaysFullscreen))
        .await
        .unwrap();
    session.start().unwrap();
    session.select_current(1).unwrap();
    session.submit().unwrap();
    let end = services.sessions().finish(&session).await.unwrap();
    let SessionEnd::Recorded { result_id, .. } = end else {
        panic!("submitted attempt should be recorded");
    };

    let results = services.results();
    assert_eq!(results.result(result_id).await.unwrap().correct(), 1);
    let stats = results.stats(QuizId::new(10)).await.unwrap();
    assert_eq!(stats.attempts, 1);
    assert_eq!(stats.best_percentage, 50);
}
