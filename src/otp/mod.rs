//! OTP domain: quota policy, code issuance, and code verification.
//!
//! [`OtpService`] wires the fixed-window limiter and the identity provider
//! together. Handlers call it; it owns the gate ordering (shape validation,
//! then quota, then provider work) and the provider-error translation.

pub mod clock;
pub mod email;
pub mod error;
pub mod rate_limit;

mod issuer;
mod verifier;

pub use error::OtpError;
pub use issuer::SendConfirmation;
pub use verifier::{
    DASHBOARD_PATH, ORGANIZATION_ONBOARDING_PATH, PROFILE_ONBOARDING_PATH, VerifySuccess,
};

use std::time::Duration;

use crate::provider::IdentityProvider;

use rate_limit::{FixedWindowLimiter, OtpAction, RateLimitQuota, quota_key};

const DEFAULT_SEND_QUOTA: RateLimitQuota = RateLimitQuota::new(3, Duration::from_secs(5 * 60));
const DEFAULT_VERIFY_QUOTA: RateLimitQuota = RateLimitQuota::new(5, Duration::from_secs(5 * 60));
const DEFAULT_RESEND_QUOTA: RateLimitQuota = RateLimitQuota::new(2, Duration::from_secs(10 * 60));
const DEFAULT_PROVIDER_THROTTLE_COOLDOWN_SECONDS: u64 = 60;

/// Quotas and copy-independent knobs for the OTP flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtpPolicy {
    send_quota: RateLimitQuota,
    verify_quota: RateLimitQuota,
    resend_quota: RateLimitQuota,
    provider_throttle_cooldown_seconds: u64,
}

impl OtpPolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            send_quota: DEFAULT_SEND_QUOTA,
            verify_quota: DEFAULT_VERIFY_QUOTA,
            resend_quota: DEFAULT_RESEND_QUOTA,
            provider_throttle_cooldown_seconds: DEFAULT_PROVIDER_THROTTLE_COOLDOWN_SECONDS,
        }
    }

    #[must_use]
    pub const fn with_send_quota(mut self, quota: RateLimitQuota) -> Self {
        self.send_quota = quota;
        self
    }

    #[must_use]
    pub const fn with_verify_quota(mut self, quota: RateLimitQuota) -> Self {
        self.verify_quota = quota;
        self
    }

    #[must_use]
    pub const fn with_resend_quota(mut self, quota: RateLimitQuota) -> Self {
        self.resend_quota = quota;
        self
    }

    #[must_use]
    pub const fn with_provider_throttle_cooldown_seconds(mut self, seconds: u64) -> Self {
        self.provider_throttle_cooldown_seconds = seconds;
        self
    }

    const fn quota(&self, action: OtpAction) -> RateLimitQuota {
        match action {
            OtpAction::Send => self.send_quota,
            OtpAction::Verify => self.verify_quota,
            OtpAction::Resend => self.resend_quota,
        }
    }
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// The OTP flows: send, verify, resend.
pub struct OtpService {
    policy: OtpPolicy,
    limiter: FixedWindowLimiter,
    provider: IdentityProvider,
}

impl OtpService {
    #[must_use]
    pub fn new(policy: OtpPolicy, limiter: FixedWindowLimiter, provider: IdentityProvider) -> Self {
        Self {
            policy,
            limiter,
            provider,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &IdentityProvider {
        &self.provider
    }

    /// Charge one attempt against the action's quota for this email.
    fn charge_quota(&self, action: OtpAction, email_normalized: &str) -> Result<(), OtpError> {
        let key = quota_key(action, email_normalized);
        if self.limiter.check(&key, self.policy.quota(action)) {
            Ok(())
        } else {
            Err(OtpError::RateLimited {
                cooldown_seconds: self.limiter.remaining_cooldown(&key),
            })
        }
    }
}
