use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{
    PracticeMode, QuestionItem, QuestionLimit, SessionConfig, SessionResult,
};

/// Failure reaching a question collaborator.
///
/// Distinct from an empty fetch result: an empty list means "no matching
/// data for this filter", which callers surface differently from a failed
/// request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Failure persisting a session result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Supplies the ordered question list for a practice configuration.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch questions for `config`.
    ///
    /// Bounded configurations get at most `limit` items. An empty vec is a
    /// valid outcome meaning no dictionary data matches the filter.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` when the collaborator cannot be reached or
    /// returns something unusable.
    async fn fetch_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<QuestionItem>, TransportError>;
}

/// Accepts finished session results.
#[async_trait]
pub trait SessionResultStore: Send + Sync {
    /// Persist one session result.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the result cannot be stored.
    async fn append_result(&self, result: &SessionResult) -> Result<(), StoreError>;
}

/// Persisted shape for a session result.
///
/// Mirrors the domain `SessionResult` so stores can serialize without
/// leaking persistence concerns into the domain layer. Derived values
/// (elapsed seconds, percentage) are stored alongside the counters so the
/// history is readable without the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResultRecord {
    pub username: String,
    pub mode: String,
    pub bounded: bool,
    pub limit: Option<u32>,
    pub correct: u32,
    pub incorrect: u32,
    pub max_streak: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    pub percentage: f64,
}

impl SessionResultRecord {
    #[must_use]
    pub fn from_result(result: &SessionResult) -> Self {
        Self {
            username: result.username().to_string(),
            mode: result.mode_label().to_string(),
            bounded: result.is_bounded(),
            limit: result.limit(),
            correct: result.correct(),
            incorrect: result.incorrect(),
            max_streak: result.max_streak(),
            started_at: result.started_at(),
            completed_at: result.completed_at(),
            elapsed_seconds: result.elapsed_seconds(),
            percentage: result.percentage(),
        }
    }

    /// Convert the record back into a domain `SessionResult`.
    ///
    /// # Errors
    ///
    /// Returns a core error when the stored mode label is unknown or the
    /// counters fail the domain invariants.
    pub fn into_result(self) -> Result<SessionResult, quiz_core::Error> {
        let mode = PracticeMode::from_label(&self.mode)?;
        let limit = match self.limit {
            Some(count) => QuestionLimit::bounded(count)?,
            None => QuestionLimit::Unlimited,
        };
        Ok(SessionResult::new(
            self.username,
            mode,
            limit,
            self.correct,
            self.incorrect,
            self.max_streak,
            self.started_at,
            self.completed_at,
        )?)
    }
}

/// Fixed-list provider for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    items: Vec<QuestionItem>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new(items: Vec<QuestionItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl QuestionProvider for InMemoryProvider {
    async fn fetch_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<QuestionItem>, TransportError> {
        let mut items = self.items.clone();
        if let QuestionLimit::Bounded(count) = config.limit() {
            items.truncate(usize::try_from(count).unwrap_or(usize::MAX));
        }
        Ok(items)
    }
}

/// In-memory result store recording everything it receives.
#[derive(Clone, Default)]
pub struct InMemoryResultStore {
    results: Arc<Mutex<Vec<SessionResult>>>,
}

impl InMemoryResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded results, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock was poisoned.
    #[must_use]
    pub fn results(&self) -> Vec<SessionResult> {
        self.results.lock().expect("result store lock").clone()
    }
}

#[async_trait]
impl SessionResultStore for InMemoryResultStore {
    async fn append_result(&self, result: &SessionResult) -> Result<(), StoreError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        guard.push(result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerStyle, CategoryFilter};
    use quiz_core::time::fixed_now;

    fn build_items(count: usize) -> Vec<QuestionItem> {
        (0..count)
            .map(|i| QuestionItem::free_text(format!("Q{i}"), vec![format!("a{i}")]).unwrap())
            .collect()
    }

    fn config_with_limit(limit: QuestionLimit) -> SessionConfig {
        SessionConfig::new(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            CategoryFilter::All,
            limit,
            "guest",
        )
    }

    #[tokio::test]
    async fn in_memory_provider_truncates_bounded_requests() {
        let provider = InMemoryProvider::new(build_items(5));

        let bounded = provider
            .fetch_questions(&config_with_limit(QuestionLimit::Bounded(3)))
            .await
            .unwrap();
        assert_eq!(bounded.len(), 3);

        let unlimited = provider
            .fetch_questions(&config_with_limit(QuestionLimit::Unlimited))
            .await
            .unwrap();
        assert_eq!(unlimited.len(), 5);
    }

    #[tokio::test]
    async fn result_record_round_trips() {
        let result = SessionResult::new(
            "maria",
            PracticeMode::Translation,
            QuestionLimit::Bounded(10),
            7,
            3,
            4,
            fixed_now(),
            fixed_now() + chrono::Duration::seconds(120),
        )
        .unwrap();

        let record = SessionResultRecord::from_result(&result);
        assert_eq!(record.mode, "translation");
        assert_eq!(record.percentage, 70.00);
        assert_eq!(record.elapsed_seconds, 120);

        let restored = record.into_result().unwrap();
        assert_eq!(restored, result);
    }
}
