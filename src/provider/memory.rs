//! In-memory identity provider for development and tests.
//!
//! Honors the same contract a remote provider would: 6-digit random codes,
//! a 5-minute TTL, one-time redemption, and a failed-attempt cap. Codes are
//! handed to an [`EmailSender`]; the default sender logs them so a developer
//! can sign in from the service logs.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::otp::clock::Clock;

use super::email::{EmailMessage, EmailSender};
use super::{ProviderError, VerifiedIdentity};

const CODE_TTL: Duration = Duration::from_secs(5 * 60);
const MAX_FAILED_ATTEMPTS: u32 = 5;

struct PendingCode {
    code: String,
    expires_at_ms: u64,
    failed_attempts: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct IdentityFlags {
    profile_complete: bool,
    organization_member: bool,
}

pub struct MemoryIdentityProvider {
    clock: Arc<dyn Clock>,
    sender: Arc<dyn EmailSender>,
    codes: Mutex<HashMap<String, PendingCode>>,
    identities: Mutex<HashMap<String, IdentityFlags>>,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, sender: Arc<dyn EmailSender>) -> Self {
        Self {
            clock,
            sender,
            codes: Mutex::new(HashMap::new()),
            identities: Mutex::new(HashMap::new()),
        }
    }

    /// Seed profile/organization flags for an identity, so demo setups can
    /// exercise every redirect branch.
    pub async fn set_identity_flags(
        &self,
        email: &str,
        profile_complete: bool,
        organization_member: bool,
    ) {
        self.identities.lock().await.insert(
            email.to_string(),
            IdentityFlags {
                profile_complete,
                organization_member,
            },
        );
    }

    /// Create-or-reuse the identity and dispatch a fresh code. A new code
    /// replaces any pending one for the address.
    ///
    /// # Errors
    /// Returns `ProviderError::Unavailable` when the sender fails.
    pub async fn send_code(&self, email: &str) -> Result<(), ProviderError> {
        let now = self.clock.now_unix_ms();
        let code = generate_code();
        let message = EmailMessage {
            to_email: email.to_string(),
            subject: "Your sign-in code".to_string(),
            body: format!("Your sign-in code is {code}. It expires in 5 minutes."),
        };
        self.sender
            .send(&message)
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;

        let mut codes = self.codes.lock().await;
        codes.retain(|_, pending| pending.expires_at_ms >= now);
        let ttl_ms = u64::try_from(CODE_TTL.as_millis()).unwrap_or(u64::MAX);
        codes.insert(
            email.to_string(),
            PendingCode {
                code,
                expires_at_ms: now.saturating_add(ttl_ms),
                failed_attempts: 0,
            },
        );
        drop(codes);

        self.identities
            .lock()
            .await
            .entry(email.to_string())
            .or_default();
        Ok(())
    }

    /// Redeem `code` for `email`. Success consumes the pending code.
    ///
    /// # Errors
    /// `CodeExpired` past the TTL, `CodeInvalid` for wrong digits, a missing
    /// or already-redeemed code, or a code burned by too many wrong guesses.
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<VerifiedIdentity, ProviderError> {
        let now = self.clock.now_unix_ms();
        let mut codes = self.codes.lock().await;
        let Some(mut pending) = codes.remove(email) else {
            return Err(ProviderError::CodeInvalid);
        };
        if now > pending.expires_at_ms {
            return Err(ProviderError::CodeExpired);
        }
        if pending.code != code {
            pending.failed_attempts += 1;
            // The cap burns the code; the entry is only put back below it.
            if pending.failed_attempts < MAX_FAILED_ATTEMPTS {
                codes.insert(email.to_string(), pending);
            }
            return Err(ProviderError::CodeInvalid);
        }
        drop(codes);

        let flags = self
            .identities
            .lock()
            .await
            .get(email)
            .copied()
            .unwrap_or_default();
        Ok(VerifiedIdentity {
            session_token: Uuid::new_v4().to_string(),
            profile_complete: flags.profile_complete,
            organization_member: flags.organization_member,
        })
    }
}

fn generate_code() -> String {
    let value = rand::thread_rng().gen_range(0..1_000_000_u32);
    format!("{value:06}")
}
