//! Error taxonomy for the OTP flows.
//!
//! Every failure surfaces as a user-facing message plus a stable machine
//! code; rate-limit failures additionally carry a machine-readable
//! `cooldown_seconds`. None of these are fatal to the process.

/// Wait copy shows whole minutes, rounded up, never less than one.
fn wait_minutes(cooldown_seconds: u64) -> String {
    let minutes = cooldown_seconds.div_ceil(60).max(1);
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    /// Bad input shape. The message names the first violated rule and is
    /// surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// Too many attempts for the window. Not retried automatically.
    #[error("Too many attempts. Please try again in {}.", wait_minutes(*.cooldown_seconds))]
    RateLimited { cooldown_seconds: u64 },

    /// Code TTL elapsed at the provider.
    #[error("This code has expired. Please request a new one.")]
    Expired,

    /// Wrong digits, or a code that was already redeemed.
    #[error("Invalid code. Please check and try again.")]
    InvalidCode,

    /// Opaque upstream failure. The detail goes to logs, not to users.
    #[error("Something went wrong. Please try again.")]
    Transient(String),
}

impl OtpError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::RateLimited { .. } => "rate_limit_error",
            Self::Expired => "expired_error",
            Self::InvalidCode => "invalid_code_error",
            Self::Transient(_) => "transient_error",
        }
    }

    /// Seconds the caller should wait, for rate-limit failures only.
    #[must_use]
    pub const fn cooldown_seconds(&self) -> Option<u64> {
        match self {
            Self::RateLimited { cooldown_seconds } => Some(*cooldown_seconds),
            _ => None,
        }
    }
}
