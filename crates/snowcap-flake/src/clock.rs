use jiff::{SignedDuration, Timestamp};
use std::time::{Duration, Instant};

/// Longest single sleep while waiting on the system clock. Waking up this often
/// lets the loop notice a clock that jumped forward (or back) while asleep.
const MAX_SLEEP_SLICE: Duration = Duration::from_millis(10);

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block until the clock reaches the target time, giving up after `timeout`
    /// of real time. Callers re-read [`Clock::now`] to see which one happened.
    fn wait_until(&self, target: Timestamp, timeout: Duration);
}

/// Wall clock backed by [`Timestamp::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_until(&self, target: Timestamp, timeout: Duration) {
        let started = Instant::now();
        loop {
            let now = Timestamp::now();
            if now >= target {
                return;
            }
            let budget = timeout.saturating_sub(started.elapsed());
            if budget.is_zero() {
                return;
            }
            let remaining = target.duration_since(now);
            std::thread::sleep(sleep_slice(remaining).min(budget));
        }
    }
}

fn sleep_slice(remaining: SignedDuration) -> Duration {
    // A sub-millisecond gap still sleeps a little so the loop never spins hot.
    remaining
        .unsigned_abs()
        .clamp(Duration::from_micros(50), MAX_SLEEP_SLICE)
}
