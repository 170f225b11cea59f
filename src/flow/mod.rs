//! Client-side sign-in flow state machines.
//!
//! These are embeddable building blocks for a frontend: the multi-field
//! code input, the resend cooldown countdown, and the progressive-backoff
//! attempt tracker. All three are advisory UX state; the server-side
//! quotas in [`crate::otp`] stay authoritative.

pub mod attempts;
pub mod code_input;
pub mod cooldown;

pub use attempts::AttemptTracker;
pub use code_input::{CellView, CodeInputState, Transition};
pub use cooldown::{CooldownRunner, CooldownState};
