use std::time::{Duration, Instant};

/// Monotonic time since some fixed start.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Gates simulation steps so they run at a fixed rate whatever the frame rate is.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    last_tick: Duration,
}

impl TickTimer {
    pub fn new(interval: Duration, now: Duration) -> Self {
        TickTimer { interval, last_tick: now }
    }

    /// True once strictly more than `interval` has passed since the last tick that
    /// fired. Firing restarts the wait from `now`.
    pub fn ready(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_tick) > self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}
