use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use quiz_core::Clock;

/// Periodic elapsed-time publisher for one session.
///
/// A background task samples the clock once per second and publishes whole
/// seconds since the session started. Dropping the ticker aborts the task,
/// so a finished session can never keep driving a newer session's display.
#[derive(Debug)]
pub struct SessionTicker {
    handle: JoinHandle<()>,
    elapsed: watch::Receiver<u64>,
}

impl SessionTicker {
    /// Spawn the per-second publisher. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(clock: Clock, started_at: DateTime<Utc>) -> Self {
        let (tx, rx) = watch::channel(0);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(clock.elapsed_seconds_since(started_at)).is_err() {
                    break;
                }
            }
        });
        Self {
            handle,
            elapsed: rx,
        }
    }

    /// Latest published reading.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        *self.elapsed.borrow()
    }

    /// Receiver for live display updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed.clone()
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use quiz_core::time::{fixed_clock, fixed_now};

    #[tokio::test(start_paused = true)]
    async fn publishes_elapsed_seconds_from_the_clock() {
        let started_at = fixed_now();
        let clock = Clock::fixed(fixed_now() + ChronoDuration::seconds(5));
        let ticker = SessionTicker::spawn(clock, started_at);

        let mut rx = ticker.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 5);
        assert_eq!(ticker.elapsed_seconds(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_ticker_closes_the_channel() {
        let ticker = SessionTicker::spawn(fixed_clock(), fixed_now());
        let mut rx = ticker.subscribe();
        rx.changed().await.unwrap();

        drop(ticker);
        // The aborted task releases the sender; pending notifications drain
        // and then the channel reports closed.
        while rx.changed().await.is_ok() {}
    }
}
