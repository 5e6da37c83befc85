use std::sync::Arc;

use async_trait::async_trait;
use providers::{
    InMemoryProvider, InMemoryResultStore, QuestionProvider, SessionResultStore, TransportError,
};
use quiz_core::model::{
    AnswerStyle, CategoryFilter, PracticeMode, QuestionItem, QuestionLimit, SessionConfig,
};
use quiz_core::time::fixed_clock;
use services::{PracticeLoopService, SessionError};

fn free_text_questions(count: usize) -> Vec<QuestionItem> {
    (0..count)
        .map(|i| QuestionItem::free_text(format!("Q{i}"), vec![format!("a{i}")]).unwrap())
        .collect()
}

fn config(mode: PracticeMode, style: AnswerStyle, limit: QuestionLimit) -> SessionConfig {
    SessionConfig::new(mode, style, CategoryFilter::All, limit, "guest")
}

fn service(
    provider: impl QuestionProvider + 'static,
    store: &InMemoryResultStore,
) -> PracticeLoopService {
    PracticeLoopService::new(fixed_clock(), Arc::new(provider), Arc::new(store.clone()))
}

/// Let the fire-and-forget store write run on the current-thread runtime.
async fn drain_store_writes() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn bounded_session_runs_to_completion_and_persists_once() {
    let store = InMemoryResultStore::new();
    let svc = service(InMemoryProvider::new(free_text_questions(3)), &store);

    let mut session = svc
        .start_session(config(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            QuestionLimit::Bounded(3),
        ))
        .await
        .unwrap();

    let first = svc.answer_text(&mut session, "a0").unwrap();
    assert!(first.outcome.correct);
    assert!(!first.is_complete);

    let second = svc.answer_text(&mut session, "wrong").unwrap();
    assert!(!second.outcome.correct);
    assert_eq!(second.outcome.expected.as_deref(), Some("a1"));

    let third = svc.answer_text(&mut session, "a2").unwrap();
    assert!(third.is_complete);
    let result = third.result.expect("auto-finalized result");
    assert_eq!(result.correct(), 2);
    assert_eq!(result.incorrect(), 1);
    assert_eq!(result.percentage(), 66.67);
    assert_eq!(result.username(), "guest");
    assert_eq!(result.mode_label(), "simple");

    drain_store_writes().await;
    assert_eq!(store.results().len(), 1);

    // A second stop returns the same result without another write.
    let again = svc.stop_session(&mut session).unwrap();
    assert_eq!(again, result);
    drain_store_writes().await;
    assert_eq!(store.results().len(), 1);
}

#[tokio::test]
async fn unlimited_session_cycles_until_stopped() {
    let store = InMemoryResultStore::new();
    let svc = service(InMemoryProvider::new(free_text_questions(3)), &store);

    let mut session = svc
        .start_session(config(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            QuestionLimit::Unlimited,
        ))
        .await
        .unwrap();

    for k in 0..7 {
        assert_eq!(session.current_question().prompt(), format!("Q{}", k % 3));
        let answered = svc
            .answer_text(&mut session, &format!("a{}", k % 3))
            .unwrap();
        assert!(!answered.is_complete);
    }

    let result = svc.stop_session(&mut session).unwrap();
    assert!(!result.is_bounded());
    assert_eq!(result.correct(), 7);
    assert_eq!(result.max_streak(), 7);

    drain_store_writes().await;
    assert_eq!(store.results().len(), 1);
}

#[tokio::test]
async fn empty_fetch_is_no_content_and_start_can_be_retried() {
    let store = InMemoryResultStore::new();
    let empty = service(InMemoryProvider::new(Vec::new()), &store);

    let err = empty
        .start_session(config(
            PracticeMode::WhQuestion,
            AnswerStyle::Typed,
            QuestionLimit::Unlimited,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Empty));

    // With data available the same configuration starts normally.
    let stocked = service(InMemoryProvider::new(free_text_questions(2)), &store);
    let session = stocked
        .start_session(config(
            PracticeMode::WhQuestion,
            AnswerStyle::Typed,
            QuestionLimit::Unlimited,
        ))
        .await
        .unwrap();
    assert_eq!(session.total_questions(), 2);
    assert!(store.results().is_empty());
}

#[tokio::test]
async fn transport_failure_is_distinct_from_no_content() {
    struct FailingProvider;

    #[async_trait]
    impl QuestionProvider for FailingProvider {
        async fn fetch_questions(
            &self,
            _config: &SessionConfig,
        ) -> Result<Vec<QuestionItem>, TransportError> {
            Err(TransportError::Request("connection refused".into()))
        }
    }

    let store = InMemoryResultStore::new();
    let svc = service(FailingProvider, &store);

    let err = svc
        .start_session(config(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            QuestionLimit::Bounded(10),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}

#[tokio::test]
async fn choice_sessions_flow_through_the_same_loop() {
    let question = QuestionItem::multiple_choice(
        "Pick the past of 'go'",
        vec!["goed".into(), "went".into(), "gone".into()],
        1,
    )
    .unwrap();
    let store = InMemoryResultStore::new();
    let svc = service(InMemoryProvider::new(vec![question.clone(), question]), &store);

    let mut session = svc
        .start_session(config(
            PracticeMode::SimplePast,
            AnswerStyle::Choice,
            QuestionLimit::Bounded(2),
        ))
        .await
        .unwrap();

    assert!(svc.answer_choice(&mut session, 1).unwrap().outcome.correct);
    let last = svc.answer_choice(&mut session, 0).unwrap();
    assert!(!last.outcome.correct);
    assert!(last.is_complete);

    drain_store_writes().await;
    let results = store.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].correct(), 1);
    assert_eq!(results[0].incorrect(), 1);
    assert_eq!(results[0].percentage(), 50.00);
}

#[tokio::test]
async fn store_failure_never_reaches_the_session_flow() {
    struct FailingStore;

    #[async_trait]
    impl SessionResultStore for FailingStore {
        async fn append_result(
            &self,
            _result: &quiz_core::model::SessionResult,
        ) -> Result<(), providers::StoreError> {
            Err(providers::StoreError::Connection("disk full".into()))
        }
    }

    let svc = PracticeLoopService::new(
        fixed_clock(),
        Arc::new(InMemoryProvider::new(free_text_questions(1))),
        Arc::new(FailingStore),
    );

    let mut session = svc
        .start_session(config(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            QuestionLimit::Bounded(1),
        ))
        .await
        .unwrap();

    // The failed write is logged and swallowed; the caller still gets its
    // completed result.
    let answered = svc.answer_text(&mut session, "a0").unwrap();
    assert!(answered.is_complete);
    assert!(answered.result.is_some());
    drain_store_writes().await;
}
