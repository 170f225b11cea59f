//! API handlers for sezamo.
//!
//! Route handlers are grouped by concern: OTP sign-in under `otp`, health
//! probes under `health`, and the undocumented root banner under `root`.

pub mod health;
pub mod otp;
pub mod root;
