//! Code issuance: the send and resend flows.

use tracing::error;

use crate::provider::ProviderError;

use super::OtpService;
use super::email::{normalize_email, validate_email};
use super::error::OtpError;
use super::rate_limit::OtpAction;

const SEND_CONFIRMATION: &str = "We sent a sign-in code to your email.";
const RESEND_CONFIRMATION: &str = "We sent a new sign-in code to your email.";

/// Confirmation of a dispatched code. The code value itself never leaves
/// the provider and the user's inbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendConfirmation {
    pub message: String,
}

impl OtpService {
    /// Validate the address, charge the send quota, and have the provider
    /// dispatch a code.
    ///
    /// # Errors
    /// `Validation` for a malformed or provider-rejected address,
    /// `RateLimited` when the send quota is exhausted or the provider
    /// throttles, `Transient` for any other provider failure.
    pub async fn send_code(&self, email: &str) -> Result<SendConfirmation, OtpError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        self.charge_quota(OtpAction::Send, &email)?;
        self.dispatch(&email).await?;
        Ok(SendConfirmation {
            message: SEND_CONFIRMATION.to_string(),
        })
    }

    /// Re-deliver a code under the stricter resend quota, then the full send
    /// flow (including its own quota).
    ///
    /// # Errors
    /// As [`OtpService::send_code`], with the resend quota checked first.
    pub async fn resend_code(&self, email: &str) -> Result<SendConfirmation, OtpError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        self.charge_quota(OtpAction::Resend, &email)?;
        self.charge_quota(OtpAction::Send, &email)?;
        self.dispatch(&email).await?;
        Ok(SendConfirmation {
            message: RESEND_CONFIRMATION.to_string(),
        })
    }

    async fn dispatch(&self, email_normalized: &str) -> Result<(), OtpError> {
        self.provider.send_code(email_normalized).await.map_err(|err| {
            map_send_provider_error(err, self.policy.provider_throttle_cooldown_seconds)
        })
    }
}

/// Send-path provider failures collapse into three buckets.
fn map_send_provider_error(err: ProviderError, default_cooldown_seconds: u64) -> OtpError {
    match err {
        ProviderError::Throttled {
            retry_after_seconds,
        } => OtpError::RateLimited {
            cooldown_seconds: retry_after_seconds.unwrap_or(default_cooldown_seconds),
        },
        ProviderError::RejectedAddress(message) => OtpError::Validation(message),
        other => {
            error!("identity provider send failed: {other}");
            OtpError::Transient(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_throttle_maps_to_rate_limited_with_default_cooldown() {
        let err = map_send_provider_error(
            ProviderError::Throttled {
                retry_after_seconds: None,
            },
            60,
        );
        assert_eq!(
            err,
            OtpError::RateLimited {
                cooldown_seconds: 60
            }
        );

        let err = map_send_provider_error(
            ProviderError::Throttled {
                retry_after_seconds: Some(90),
            },
            60,
        );
        assert_eq!(
            err,
            OtpError::RateLimited {
                cooldown_seconds: 90
            }
        );
    }

    #[test]
    fn rejected_address_maps_to_validation_verbatim() {
        let err = map_send_provider_error(
            ProviderError::RejectedAddress("mailbox does not exist".to_string()),
            60,
        );
        assert_eq!(
            err,
            OtpError::Validation("mailbox does not exist".to_string())
        );
    }

    #[test]
    fn other_provider_failures_map_to_transient() {
        let err = map_send_provider_error(ProviderError::Unavailable("boom".to_string()), 60);
        assert!(matches!(err, OtpError::Transient(_)));

        // Codes never expire on the send path; anything odd is transient.
        let err = map_send_provider_error(ProviderError::CodeExpired, 60);
        assert!(matches!(err, OtpError::Transient(_)));
    }

    #[test]
    fn confirmations_distinguish_resends() {
        assert_ne!(SEND_CONFIRMATION, RESEND_CONFIRMATION);
        assert!(RESEND_CONFIRMATION.contains("new"));
    }
}
