use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::matching;
use quiz_core::model::{AnswerKey, QuestionItem, SessionConfig, SessionResult};

use super::progress::SessionProgress;
use super::ticker::SessionTicker;
use crate::error::SessionError;

/// Streak cadence for celebration hints.
const STREAK_MILESTONE: u32 = 5;

//
// ─── EVALUATION OUTCOME ────────────────────────────────────────────────────────
//

/// Outcome of judging a single answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub correct: bool,
    /// Primary accepted answer, present on misses for display.
    pub expected: Option<String>,
    pub streak: u32,
    /// True whenever the streak lands on a positive multiple of five.
    /// A presentation hint, not a scoring effect.
    pub streak_milestone: bool,
    pub is_complete: bool,
}

//
// ─── PRACTICE SESSION ──────────────────────────────────────────────────────────
//

/// In-memory state of one practice run.
///
/// Built only after the provider returned a non-empty question list; steps
/// through the questions, judging answers and keeping score. Bounded runs
/// complete on their last answer, unlimited runs cycle through the pool
/// until stopped.
pub struct PracticeSession {
    config: SessionConfig,
    questions: Vec<QuestionItem>,
    position: usize,
    correct: u32,
    incorrect: u32,
    streak: u32,
    best_streak: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<SessionResult>,
    ticker: Option<SessionTicker>,
}

impl PracticeSession {
    /// Create a session over a fetched question list.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no questions are provided.
    pub fn new(
        config: SessionConfig,
        questions: Vec<QuestionItem>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            config,
            questions,
            position: 0,
            correct: 0,
            incorrect: 0,
            streak: 0,
            best_streak: 0,
            started_at,
            completed_at: None,
            result: None,
            ticker: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Questions answered so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Size of the fetched question pool.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The finalized result, once [`PracticeSession::finalize`] ran.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The question to present next.
    ///
    /// Unlimited runs cycle through the pool, so the index wraps; bounded
    /// runs complete before a wrap can happen.
    #[must_use]
    pub fn current_question(&self) -> &QuestionItem {
        &self.questions[self.position % self.questions.len()]
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let remaining = if self.config.limit().is_bounded() {
            Some(self.questions.len().saturating_sub(self.position))
        } else {
            None
        };
        SessionProgress {
            answered: self.position,
            correct: self.correct,
            incorrect: self.incorrect,
            streak: self.streak,
            best_streak: self.best_streak,
            remaining,
            is_complete: self.is_complete(),
        }
    }

    /// Whole seconds the session has been running (or ran, once complete).
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        let end = self.completed_at.unwrap_or(now);
        u64::try_from((end - self.started_at).num_seconds()).unwrap_or(0)
    }

    /// Judge a typed answer against the current free-text question.
    ///
    /// Input and accepted answers are normalized (trimmed, lowercased,
    /// diacritics stripped) before comparison; any accepted variant counts.
    /// Advances the session whatever the verdict.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already finished and
    /// `SessionError::ExpectsChoice` if the current question is
    /// multiple-choice.
    pub fn submit_answer(
        &mut self,
        raw: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<EvaluationOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let correct = match self.current_question().key() {
            AnswerKey::FreeText { answers } => matching::matches_any(raw, answers),
            AnswerKey::MultipleChoice { .. } => return Err(SessionError::ExpectsChoice),
        };
        Ok(self.record(correct, answered_at))
    }

    /// Judge a selected option against the current multiple-choice question.
    ///
    /// Any index other than the correct one (including out-of-range values)
    /// is an ordinary incorrect answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already finished and
    /// `SessionError::ExpectsText` if the current question is free-text.
    pub fn submit_choice(
        &mut self,
        selected: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<EvaluationOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let correct = match self.current_question().key() {
            AnswerKey::MultipleChoice { correct_index, .. } => selected == *correct_index,
            AnswerKey::FreeText { .. } => return Err(SessionError::ExpectsText),
        };
        Ok(self.record(correct, answered_at))
    }

    fn record(&mut self, correct: bool, answered_at: DateTime<Utc>) -> EvaluationOutcome {
        let expected = if correct {
            None
        } else {
            Some(self.current_question().key().primary_answer().to_string())
        };

        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }

        self.position += 1;
        if self.config.limit().is_bounded() && self.position >= self.questions.len() {
            self.completed_at = Some(answered_at);
        }

        EvaluationOutcome {
            correct,
            expected,
            streak: self.streak,
            streak_milestone: correct && self.streak % STREAK_MILESTONE == 0,
            is_complete: self.is_complete(),
        }
    }

    /// Finalize the session, stopping the elapsed-time ticker.
    ///
    /// Idempotent: the result is built once and cached; later calls return
    /// the cached value. Callers that persist the result must check
    /// [`PracticeSession::result`] beforehand to avoid a second write.
    ///
    /// # Errors
    ///
    /// Propagates result-validation errors.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<&SessionResult, SessionError> {
        // Dropping the handle cancels the ticker task; taking it out of the
        // Option makes that happen at most once.
        drop(self.ticker.take());

        if self.result.is_none() {
            let completed_at = *self.completed_at.get_or_insert(now);
            let result = SessionResult::new(
                self.config.username(),
                self.config.mode(),
                self.config.limit(),
                self.correct,
                self.incorrect,
                self.best_streak,
                self.started_at,
                completed_at,
            )?;
            self.result = Some(result);
        }
        self.result.as_ref().ok_or(SessionError::Completed)
    }

    pub(crate) fn attach_ticker(&mut self, ticker: SessionTicker) {
        // One live ticker per session; replacing drops (cancels) the old one.
        self.ticker = Some(ticker);
    }

    /// Latest elapsed-seconds reading published by the ticker, when armed.
    #[must_use]
    pub fn ticker_elapsed(&self) -> Option<u64> {
        self.ticker.as_ref().map(SessionTicker::elapsed_seconds)
    }

    /// Receiver for the per-second elapsed display, when the ticker is armed.
    #[must_use]
    pub fn subscribe_elapsed(&self) -> Option<tokio::sync::watch::Receiver<u64>> {
        self.ticker.as_ref().map(SessionTicker::subscribe)
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("mode", &self.config.mode())
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("correct", &self.correct)
            .field("incorrect", &self.incorrect)
            .field("best_streak", &self.best_streak)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
