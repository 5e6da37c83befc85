use chrono::{DateTime, Duration, Utc};

/// Clock abstraction so sessions and tests agree on what "now" means.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Whole seconds elapsed since `start`, clamped at zero.
    #[must_use]
    pub fn elapsed_seconds_since(&self, start: DateTime<Utc>) -> u64 {
        u64::try_from((self.now() - start).num_seconds()).unwrap_or(0)
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests and doc examples (2024-07-03T08:26:40Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_720_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_elapsed_from_start() {
        let start = fixed_now();
        let mut clock = Clock::fixed(start);
        assert_eq!(clock.elapsed_seconds_since(start), 0);

        clock.advance(Duration::seconds(42));
        assert_eq!(clock.elapsed_seconds_since(start), 42);
    }

    #[test]
    fn elapsed_clamps_at_zero() {
        let clock = fixed_clock();
        let later = fixed_now() + Duration::seconds(10);
        assert_eq!(clock.elapsed_seconds_since(later), 0);
    }
}
