//! # Sezamo (Email OTP Sign-In)
//!
//! `sezamo` is a passwordless authentication front door. Users sign in with
//! short-lived one-time codes delivered over email; code delivery and
//! redemption are delegated to an identity provider while `sezamo` enforces
//! its own abuse controls and resolves where a signed-in user lands.
//!
//! ## Sign-In Flow
//!
//! - **Issue:** `POST /v1/auth/otp/send` validates the address, charges the
//!   send quota, and asks the provider to deliver a 6-digit code.
//! - **Verify:** `POST /v1/auth/otp/verify` redeems the code for a provider
//!   session, sets the session cookie, and resolves the post-login redirect:
//!   profile onboarding, then organization onboarding, then the dashboard.
//! - **Resend:** `POST /v1/auth/otp/resend` re-delivers a code under a
//!   stricter quota and reports the cooldown the client should honor.
//!
//! ## Abuse Controls
//!
//! Quotas are fixed windows keyed by `action:email`: 3 sends per 5 minutes,
//! 5 verification attempts per 5 minutes, 2 resends per 10 minutes. A
//! successful verification clears the send and verify windows for that
//! address so a returning user starts clean.
//!
//! ## Providers
//!
//! - **Remote:** any HTTP service implementing the small send/verify
//!   contract (see `provider::http`).
//! - **Memory:** a built-in dev provider that mints codes locally and logs
//!   them instead of sending email.

pub mod api;
pub mod cli;
pub mod flow;
pub mod otp;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
