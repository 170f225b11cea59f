//! Identity provider collaborators.
//!
//! The provider owns code generation, dispatch, TTL, and one-time
//! redemption; this service only orchestrates around it. Two
//! implementations ship: an HTTP client for a remote provider and an
//! in-memory provider for development and tests.

pub mod email;
pub mod http;
pub mod memory;

pub use email::{EmailMessage, EmailSender, LogEmailSender};
pub use http::HttpIdentityClient;
pub use memory::MemoryIdentityProvider;

/// Outcome of a successful code redemption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider-issued session token, forwarded to the caller as a cookie.
    pub session_token: String,
    /// Whether the identity has a completed profile.
    pub profile_complete: bool,
    /// Whether the identity belongs to an organization.
    pub organization_member: bool,
}

/// Provider-side failures, before mapping into the user-facing taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider throttled the request")]
    Throttled { retry_after_seconds: Option<u64> },
    #[error("provider rejected the address: {0}")]
    RejectedAddress(String),
    #[error("code expired")]
    CodeExpired,
    #[error("code invalid or already redeemed")]
    CodeInvalid,
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Health of the provider dependency, reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Remote provider is reachable and healthy.
    Ok,
    /// Remote provider is unreachable or failing.
    Error,
    /// In-memory provider means no external dependency.
    Static,
}

impl DependencyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Static => "static",
        }
    }

    #[must_use]
    pub const fn is_healthy(self) -> bool {
        !matches!(self, Self::Error)
    }
}

/// The configured provider. Remote in production, in-memory for
/// development when no provider URL is given.
pub enum IdentityProvider {
    Remote(HttpIdentityClient),
    Memory(MemoryIdentityProvider),
}

impl IdentityProvider {
    /// Ask the provider to create-or-reuse the identity and dispatch a
    /// 6-digit code to `email`.
    ///
    /// # Errors
    /// Returns a [`ProviderError`] describing the provider-side failure.
    pub async fn send_code(&self, email: &str) -> Result<(), ProviderError> {
        match self {
            Self::Remote(client) => client.send_code(email).await,
            Self::Memory(provider) => provider.send_code(email).await,
        }
    }

    /// Redeem `code` for `email`.
    ///
    /// # Errors
    /// Returns a [`ProviderError`] when the code cannot be redeemed.
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<VerifiedIdentity, ProviderError> {
        match self {
            Self::Remote(client) => client.verify_code(email, code).await,
            Self::Memory(provider) => provider.verify_code(email, code).await,
        }
    }

    /// Probe the provider dependency for `/health`.
    pub async fn dependency_status(&self) -> DependencyStatus {
        match self {
            Self::Remote(client) => client.dependency_status().await,
            Self::Memory(_) => DependencyStatus::Static,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_status_strings() {
        assert_eq!(DependencyStatus::Ok.as_str(), "ok");
        assert_eq!(DependencyStatus::Error.as_str(), "error");
        assert_eq!(DependencyStatus::Static.as_str(), "static");
    }

    #[test]
    fn static_counts_as_healthy() {
        assert!(DependencyStatus::Ok.is_healthy());
        assert!(DependencyStatus::Static.is_healthy());
        assert!(!DependencyStatus::Error.is_healthy());
    }
}
