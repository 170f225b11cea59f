//! Resend cooldown countdown.
//!
//! [`CooldownState`] is the pure countdown: start, tick once per period,
//! deactivate at zero. [`CooldownRunner`] wraps it in a spawned task that
//! publishes snapshots over a watch channel; dropping the runner aborts
//! the task, so a tick never outlives the scope that started it. The tick
//! period is injectable so tests run in milliseconds.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Pure countdown state. Resend is allowed exactly when the countdown is
/// inactive and fully drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownState {
    time_left: u64,
    active: bool,
}

impl CooldownState {
    /// Idle countdown: inactive, nothing left to wait for.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            time_left: 0,
            active: false,
        }
    }

    /// Begin counting down from `initial_seconds`. Starting at zero
    /// completes immediately and stays inactive.
    pub fn start(&mut self, initial_seconds: u64) {
        self.time_left = initial_seconds;
        self.active = initial_seconds > 0;
    }

    /// One countdown step. Returns `true` on the tick that drains the
    /// counter to zero and deactivates the timer.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Stop counting without draining. Used on teardown.
    pub fn cancel(&mut self) {
        self.time_left = 0;
        self.active = false;
    }

    #[must_use]
    pub const fn time_left(&self) -> u64 {
        self.time_left
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// True exactly when inactive with nothing left to wait for.
    #[must_use]
    pub const fn can_resend(&self) -> bool {
        !self.active && self.time_left == 0
    }
}

impl Default for CooldownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Async driver for [`CooldownState`].
///
/// The spawned task ticks once per `tick_period`, publishing each snapshot
/// on a watch channel, and exits after the draining tick. Dropping the
/// runner aborts the task.
pub struct CooldownRunner {
    handle: JoinHandle<()>,
    rx: watch::Receiver<CooldownState>,
}

impl CooldownRunner {
    /// Start a countdown from `initial_seconds`, ticking every
    /// `tick_period` (one second in production).
    #[must_use]
    pub fn start(initial_seconds: u64, tick_period: Duration) -> Self {
        let mut state = CooldownState::new();
        state.start(initial_seconds);
        let (tx, rx) = watch::channel(state);

        let handle = tokio::spawn(async move {
            while tx.borrow().is_active() {
                sleep(tick_period).await;
                let mut next = *tx.borrow();
                let finished = next.tick();
                // A closed channel means every observer is gone.
                if tx.send(next).is_err() || finished {
                    break;
                }
            }
        });

        Self { handle, rx }
    }

    /// Latest published countdown state.
    #[must_use]
    pub fn snapshot(&self) -> CooldownState {
        *self.rx.borrow()
    }

    /// Subscribe to countdown updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CooldownState> {
        self.rx.clone()
    }

    /// Wait until the countdown drains (or the runner is cancelled).
    pub async fn finished(&mut self) {
        while self.rx.borrow().is_active() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Stop the countdown now. Equivalent to dropping the runner.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for CooldownRunner {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
