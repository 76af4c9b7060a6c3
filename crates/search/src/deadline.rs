//! Cooperative cancellation for one decision. The clock is polled on every
//! `expired` call; once it reads past the end the flag sticks, so every
//! caller up the recursion sees the same answer.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    end: Option<Instant>,
    expired: bool,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            end: start.checked_add(budget),
            expired: false,
        }
    }

    /// Poll the clock and latch the result
    #[inline]
    pub fn expired(&mut self) -> bool {
        if !self.expired {
            self.expired = self.end.is_some_and(|end| Instant::now() >= end);
        }
        self.expired
    }

    /// Latched flag only, no clock read
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn budget(&self) -> Duration {
        self.end
            .map_or(Duration::MAX, |end| end.saturating_duration_since(self.start))
    }
}
