//! Code verification and post-auth redirect resolution.

use tracing::error;

use crate::provider::ProviderError;

use super::OtpService;
use super::email::{normalize_email, validate_email};
use super::error::OtpError;
use super::rate_limit::{OtpAction, quota_key};

/// Where a signed-in user lands, in priority order.
pub const PROFILE_ONBOARDING_PATH: &str = "/onboarding/profile";
pub const ORGANIZATION_ONBOARDING_PATH: &str = "/onboarding/organization";
pub const DASHBOARD_PATH: &str = "/dashboard";

const CODE_LENGTH: usize = 6;

/// A redeemed code: the provider session and where to send the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifySuccess {
    pub redirect_path: String,
    pub session_token: String,
}

impl OtpService {
    /// Validate shapes, charge the verify quota, redeem the code, and
    /// resolve the redirect. Success clears the `send:` and `verify:`
    /// windows for the address.
    ///
    /// # Errors
    /// `Validation` for a malformed email or code, `RateLimited` when the
    /// verify quota is exhausted, `Expired`, `InvalidCode`, or `Transient`
    /// per the provider's answer.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<VerifySuccess, OtpError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        let code = code.trim();
        validate_code(code)?;

        self.charge_quota(OtpAction::Verify, &email)?;

        let identity = self
            .provider
            .verify_code(&email, code)
            .await
            .map_err(map_verify_provider_error)?;

        // The only explicit deletions in the counter store.
        self.limiter.clear(&quota_key(OtpAction::Send, &email));
        self.limiter.clear(&quota_key(OtpAction::Verify, &email));

        Ok(VerifySuccess {
            redirect_path: resolve_redirect(identity.profile_complete, identity.organization_member)
                .to_string(),
            session_token: identity.session_token,
        })
    }
}

/// Exactly six ASCII digits.
fn validate_code(code: &str) -> Result<(), OtpError> {
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(OtpError::Validation(
            "Please enter the 6-digit code".to_string(),
        ));
    }
    Ok(())
}

/// Incomplete profile wins over missing organization membership.
const fn resolve_redirect(profile_complete: bool, organization_member: bool) -> &'static str {
    if !profile_complete {
        PROFILE_ONBOARDING_PATH
    } else if !organization_member {
        ORGANIZATION_ONBOARDING_PATH
    } else {
        DASHBOARD_PATH
    }
}

fn map_verify_provider_error(err: ProviderError) -> OtpError {
    match err {
        ProviderError::CodeExpired => OtpError::Expired,
        ProviderError::CodeInvalid => OtpError::InvalidCode,
        // The verify taxonomy has no rate-limit bucket; a throttling
        // provider reads as a transient fault here.
        other => {
            error!("identity provider verify failed: {other}");
            OtpError::Transient(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_code_requires_six_digits() {
        assert!(validate_code("123456").is_ok());
        assert!(validate_code("000000").is_ok());

        assert!(validate_code("12345").is_err());
        assert!(validate_code("1234567").is_err());
        assert!(validate_code("12345a").is_err());
        assert!(validate_code("12 456").is_err());
        assert!(validate_code("").is_err());
    }

    #[test]
    fn redirect_prefers_profile_onboarding() {
        assert_eq!(resolve_redirect(false, false), PROFILE_ONBOARDING_PATH);
        assert_eq!(resolve_redirect(false, true), PROFILE_ONBOARDING_PATH);
        assert_eq!(resolve_redirect(true, false), ORGANIZATION_ONBOARDING_PATH);
        assert_eq!(resolve_redirect(true, true), DASHBOARD_PATH);
    }

    #[test]
    fn provider_failures_map_onto_the_verify_taxonomy() {
        assert_eq!(
            map_verify_provider_error(ProviderError::CodeExpired),
            OtpError::Expired
        );
        assert_eq!(
            map_verify_provider_error(ProviderError::CodeInvalid),
            OtpError::InvalidCode
        );
        assert!(matches!(
            map_verify_provider_error(ProviderError::Unavailable("down".to_string())),
            OtpError::Transient(_)
        ));
        assert!(matches!(
            map_verify_provider_error(ProviderError::Throttled {
                retry_after_seconds: Some(30)
            }),
            OtpError::Transient(_)
        ));
    }
}
