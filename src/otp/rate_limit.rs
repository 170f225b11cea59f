//! Fixed-window rate limiting for OTP flows.
//!
//! Counters are keyed `action:email` and live behind an injectable store and
//! clock. The bundled store is a single-process map; a multi-instance
//! deployment would back the same trait with a shared cache holding the same
//! records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::clock::Clock;

/// OTP actions with independent quota windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpAction {
    Send,
    Verify,
    Resend,
}

impl OtpAction {
    pub(crate) const fn key_prefix(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Verify => "verify",
            Self::Resend => "resend",
        }
    }
}

/// Composite store key for one action and one normalized email.
pub(crate) fn quota_key(action: OtpAction, email_normalized: &str) -> String {
    format!("{}:{}", action.key_prefix(), email_normalized)
}

/// One counter window. `count` must never be read or bumped without first
/// checking `window_reset_at_ms` against the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at_ms: u64,
}

/// Attempt cap over a fixed window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitQuota {
    pub max_attempts: u32,
    pub window: Duration,
}

impl RateLimitQuota {
    #[must_use]
    pub const fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }
}

/// Keyed record storage behind the limiter.
///
/// Records carry their own expiry, so a TTL-indexed backend (a shared cache)
/// can treat `prune_expired` as a no-op and let keys lapse on their own.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateLimitRecord>;
    fn put(&self, key: &str, record: RateLimitRecord);
    fn remove(&self, key: &str);
    /// Drop records whose window ended before `now_ms`.
    fn prune_expired(&self, now_ms: u64);
}

/// Single-process store: a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl MemoryRateLimitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_records(&self) -> MutexGuard<'_, HashMap<String, RateLimitRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    fn get(&self, key: &str) -> Option<RateLimitRecord> {
        self.lock_records().get(key).copied()
    }

    fn put(&self, key: &str, record: RateLimitRecord) {
        self.lock_records().insert(key.to_string(), record);
    }

    fn remove(&self, key: &str) {
        self.lock_records().remove(key);
    }

    fn prune_expired(&self, now_ms: u64) {
        self.lock_records()
            .retain(|_, record| record.window_reset_at_ms >= now_ms);
    }
}

/// Fixed-window limiter over an injectable store and clock.
pub struct FixedWindowLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Charge one attempt against `key`.
    ///
    /// A missing or expired window starts fresh at `count = 1`. Inside a
    /// window, attempts below the cap increment the count. At the cap the
    /// call returns `false` and leaves the record untouched.
    pub fn check(&self, key: &str, quota: RateLimitQuota) -> bool {
        let now = self.clock.now_unix_ms();
        match self.store.get(key) {
            Some(record) if now <= record.window_reset_at_ms => {
                if record.count < quota.max_attempts {
                    self.store.put(
                        key,
                        RateLimitRecord {
                            count: record.count + 1,
                            window_reset_at_ms: record.window_reset_at_ms,
                        },
                    );
                    true
                } else {
                    false
                }
            }
            _ => {
                // Starting a window is also the moment abandoned keys get dropped.
                self.store.prune_expired(now);
                let window_ms = u64::try_from(quota.window.as_millis()).unwrap_or(u64::MAX);
                self.store.put(
                    key,
                    RateLimitRecord {
                        count: 1,
                        window_reset_at_ms: now.saturating_add(window_ms),
                    },
                );
                true
            }
        }
    }

    /// Seconds until the window for `key` resets, rounded up. Zero when no
    /// record exists or the window already expired.
    #[must_use]
    pub fn remaining_cooldown(&self, key: &str) -> u64 {
        let now = self.clock.now_unix_ms();
        match self.store.get(key) {
            Some(record) if now <= record.window_reset_at_ms => {
                (record.window_reset_at_ms - now).div_ceil(1000)
            }
            _ => 0,
        }
    }

    /// Drop the record for `key`. Only successful verification calls this.
    pub fn clear(&self, key: &str) {
        self.store.remove(key);
    }
}
