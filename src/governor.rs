use std::thread;
use std::time::{Duration, Instant};

/// Fixed-rate frame pacing for the game loop.
///
/// Each call to [`FrameGovernor::wait`] blocks until the next tick boundary.
/// A frame that overruns its deadline re-anchors the schedule to "now"
/// instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct FrameGovernor {
    interval: Duration,
    next_deadline: Instant,
}

impl FrameGovernor {
    /// Starts a schedule of `ticks_per_second` boundaries, the first one
    /// interval from now. A zero rate is clamped to one tick per second.
    #[must_use]
    pub fn new(ticks_per_second: u32) -> Self {
        Self::starting_at(ticks_per_second, Instant::now())
    }

    #[must_use]
    pub fn starting_at(ticks_per_second: u32, start: Instant) -> Self {
        let interval = Duration::from_secs(1) / ticks_per_second.max(1);
        Self {
            interval,
            next_deadline: start + interval,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next boundary, zero when already past it.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }

    /// Moves the schedule one boundary forward from `now` and returns how
    /// long the caller should sleep.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let remaining = self.remaining(now);
        if remaining.is_zero() {
            self.next_deadline = now + self.interval;
        } else {
            self.next_deadline += self.interval;
        }
        remaining
    }

    /// Blocks the current thread until the next tick boundary.
    pub fn wait(&mut self) {
        let sleep_for = self.advance(Instant::now());
        if !sleep_for.is_zero() {
            thread::sleep(sleep_for);
        }
    }
}
