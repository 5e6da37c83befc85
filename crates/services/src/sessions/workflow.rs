use std::sync::Arc;

use tracing::{debug, warn};

use providers::{QuestionProvider, SessionResultStore};
use quiz_core::model::{SessionConfig, SessionResult};

use super::engine::{EvaluationOutcome, PracticeSession};
use super::ticker::SessionTicker;
use crate::Clock;
use crate::error::SessionError;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswerResult {
    pub outcome: EvaluationOutcome,
    pub is_complete: bool,
    /// Present once the answer completed a bounded session.
    pub result: Option<SessionResult>,
}

/// Orchestrates session start, answering, and result persistence.
#[derive(Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionProvider>,
    results: Arc<dyn SessionResultStore>,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionProvider>,
        results: Arc<dyn SessionResultStore>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
        }
    }

    /// Start a new session for `config`.
    ///
    /// The returned session carries a freshly armed elapsed-time ticker;
    /// any previous session's ticker dies with the value that owned it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the provider has nothing for this
    /// filter (the user should change the configuration) and
    /// `SessionError::Transport` when the provider could not be reached
    /// (the user may retry).
    pub async fn start_session(
        &self,
        config: SessionConfig,
    ) -> Result<PracticeSession, SessionError> {
        let questions = self.questions.fetch_questions(&config).await?;
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let started_at = self.clock.now();
        debug!(
            mode = %config.mode(),
            count = questions.len(),
            "practice session started"
        );
        let mut session = PracticeSession::new(config, questions, started_at)?;
        session.attach_ticker(SessionTicker::spawn(self.clock, started_at));
        Ok(session)
    }

    /// Judge a typed answer, auto-finalizing a completed bounded session.
    ///
    /// # Errors
    ///
    /// Propagates the session's evaluation errors.
    pub fn answer_text(
        &self,
        session: &mut PracticeSession,
        raw: &str,
    ) -> Result<SessionAnswerResult, SessionError> {
        let outcome = session.submit_answer(raw, self.clock.now())?;
        self.after_answer(session, outcome)
    }

    /// Judge a selected option, auto-finalizing a completed bounded session.
    ///
    /// # Errors
    ///
    /// Propagates the session's evaluation errors.
    pub fn answer_choice(
        &self,
        session: &mut PracticeSession,
        selected: usize,
    ) -> Result<SessionAnswerResult, SessionError> {
        let outcome = session.submit_choice(selected, self.clock.now())?;
        self.after_answer(session, outcome)
    }

    fn after_answer(
        &self,
        session: &mut PracticeSession,
        outcome: EvaluationOutcome,
    ) -> Result<SessionAnswerResult, SessionError> {
        let result = if outcome.is_complete {
            Some(self.finalize(session)?)
        } else {
            None
        };
        Ok(SessionAnswerResult {
            is_complete: outcome.is_complete,
            outcome,
            result,
        })
    }

    /// Stop a session (an unlimited run, or a bounded one cut short) and
    /// persist its result.
    ///
    /// Idempotent: at most one store write happens per session, however
    /// many times this is called.
    ///
    /// # Errors
    ///
    /// Propagates result-validation errors.
    pub fn stop_session(
        &self,
        session: &mut PracticeSession,
    ) -> Result<SessionResult, SessionError> {
        self.finalize(session)
    }

    fn finalize(&self, session: &mut PracticeSession) -> Result<SessionResult, SessionError> {
        let already_submitted = session.result().is_some();
        let result = session.finalize(self.clock.now())?.clone();

        if !already_submitted {
            // Fire-and-forget: the user-facing completion path never waits
            // on the store, and a failed write only costs a history row.
            let store = Arc::clone(&self.results);
            let submitted = result.clone();
            tokio::spawn(async move {
                if let Err(e) = store.append_result(&submitted).await {
                    warn!(error = %e, "failed to persist session result");
                }
            });
        }
        Ok(result)
    }
}
