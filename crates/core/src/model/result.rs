use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::config::{PracticeMode, QuestionLimit};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("max streak ({max_streak}) exceeds correct count ({correct})")]
    StreakExceedsCorrect { max_streak: u32, correct: u32 },
}

/// Immutable record of a finished practice session.
///
/// Built once at finalize time and handed to the result store; the engine
/// does not keep it beyond the session value that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    username: String,
    mode: PracticeMode,
    limit: QuestionLimit,
    correct: u32,
    incorrect: u32,
    max_streak: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionResult {
    /// Assemble a validated session result.
    ///
    /// # Errors
    ///
    /// Returns `SessionResultError::InvalidTimeRange` when `completed_at`
    /// precedes `started_at`, and `SessionResultError::StreakExceedsCorrect`
    /// when the counters cannot have come from one session.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        username: impl Into<String>,
        mode: PracticeMode,
        limit: QuestionLimit,
        correct: u32,
        incorrect: u32,
        max_streak: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionResultError> {
        if completed_at < started_at {
            return Err(SessionResultError::InvalidTimeRange);
        }
        if max_streak > correct {
            return Err(SessionResultError::StreakExceedsCorrect {
                max_streak,
                correct,
            });
        }
        Ok(Self {
            username: username.into(),
            mode,
            limit,
            correct,
            incorrect,
            max_streak,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    /// Label recorded for the mode (what the original UI displayed).
    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        self.mode.label()
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.limit.is_bounded()
    }

    /// Configured question count, `None` for unlimited runs.
    #[must_use]
    pub fn limit(&self) -> Option<u32> {
        self.limit.count()
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
    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Whole seconds between start and completion.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        u64::try_from((self.completed_at - self.started_at).num_seconds()).unwrap_or(0)
    }

    /// Share of correct answers as a percentage, rounded to 2 decimals.
    /// `0.00` when nothing was answered.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        let total = self.total_answered();
        if total == 0 {
            return 0.0;
        }
        let raw = f64::from(self.correct) / f64::from(total) * 100.0;
        (raw * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build(correct: u32, incorrect: u32, max_streak: u32) -> SessionResult {
        SessionResult::new(
            "guest",
            PracticeMode::SimplePast,
            QuestionLimit::Bounded(10),
            correct,
            incorrect,
            max_streak,
            fixed_now(),
            fixed_now() + Duration::seconds(90),
        )
        .unwrap()
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(build(7, 3, 4).percentage(), 70.00);
        assert_eq!(build(2, 1, 2).percentage(), 66.67);
        assert_eq!(build(1, 2, 1).percentage(), 33.33);
    }

    #[test]
    fn empty_session_has_zero_percentage() {
        assert_eq!(build(0, 0, 0).percentage(), 0.00);
    }

    #[test]
    fn elapsed_counts_whole_seconds() {
        assert_eq!(build(1, 0, 1).elapsed_seconds(), 90);
    }

    #[test]
    fn completion_cannot_precede_start() {
        let err = SessionResult::new(
            "guest",
            PracticeMode::WhQuestion,
            QuestionLimit::Unlimited,
            0,
            0,
            0,
            fixed_now(),
            fixed_now() - Duration::seconds(1),
        )
        .unwrap_err();
        assert_eq!(err, SessionResultError::InvalidTimeRange);
    }

    #[test]
    fn streak_cannot_exceed_correct_count() {
        let err = SessionResult::new(
            "guest",
            PracticeMode::SimplePast,
            QuestionLimit::Bounded(5),
            2,
            0,
            3,
            fixed_now(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SessionResultError::StreakExceedsCorrect {
                max_streak: 3,
                correct: 2
            }
        );
    }
}
