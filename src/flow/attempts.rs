//! Progressive-backoff tracker for resend requests.
//!
//! Client-local pacing only: the tracker escalates the wait between resend
//! requests, but the server-side quotas in [`crate::otp`] remain the
//! boundary. Time comes from the same injectable [`Clock`] as the limiter,
//! so tests never sleep.

use std::sync::Arc;

use crate::otp::clock::Clock;

/// Escalating wait per resend, clamped at the last entry.
const BACKOFF_SCHEDULE_SECONDS: [u64; 4] = [60, 120, 300, 600];

/// Seconds a caller should wait after their `attempt`-th resend (1-based).
/// Attempts past the schedule all use the final entry.
#[must_use]
pub fn cooldown_duration_seconds(attempt: u32) -> u64 {
    let index = usize::try_from(attempt.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .min(BACKOFF_SCHEDULE_SECONDS.len() - 1);
    BACKOFF_SCHEDULE_SECONDS[index]
}

/// Resend pacing state: how many codes were requested and when the last
/// request happened.
pub struct AttemptTracker {
    clock: Arc<dyn Clock>,
    attempt_count: u32,
    last_attempt_at_ms: Option<u64>,
}

impl AttemptTracker {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            attempt_count: 0,
            last_attempt_at_ms: None,
        }
    }

    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Count one resend request and stamp it with the current time.
    pub fn record_attempt(&mut self) {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.last_attempt_at_ms = Some(self.clock.now_unix_ms());
    }

    /// True when no request was made yet, or the backoff for the last one
    /// has fully elapsed.
    #[must_use]
    pub fn can_request(&self) -> bool {
        let Some(last_ms) = self.last_attempt_at_ms else {
            return true;
        };
        let waited_ms = self.clock.now_unix_ms().saturating_sub(last_ms);
        waited_ms >= cooldown_duration_seconds(self.attempt_count) * 1000
    }

    /// Seconds left before the next request is allowed, rounded up. Zero
    /// when a request is already allowed.
    #[must_use]
    pub fn remaining_cooldown(&self) -> u64 {
        let Some(last_ms) = self.last_attempt_at_ms else {
            return 0;
        };
        let allowed_at_ms = last_ms + cooldown_duration_seconds(self.attempt_count) * 1000;
        allowed_at_ms
            .saturating_sub(self.clock.now_unix_ms())
            .div_ceil(1000)
    }

    /// Forget everything. Called on successful login.
    pub fn reset(&mut self) {
        self.attempt_count = 0;
        self.last_attempt_at_ms = None;
    }
}
