//! Shared state for the OTP endpoints.

use crate::otp::OtpService;

const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24;

/// Handler-facing configuration: where the frontend lives and how long the
/// session cookie survives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpApiConfig {
    frontend_base_url: String,
    session_ttl_seconds: u64,
}

impl OtpApiConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub const fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub const fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    /// Cookies are only marked `Secure` when the frontend is served over
    /// HTTPS, so local development keeps working.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

/// Everything the OTP handlers need, shared via an axum `Extension`.
pub struct OtpState {
    service: OtpService,
    config: OtpApiConfig,
}

impl OtpState {
    #[must_use]
    pub fn new(service: OtpService, config: OtpApiConfig) -> Self {
        Self { service, config }
    }

    #[must_use]
    pub fn service(&self) -> &OtpService {
        &self.service
    }

    #[must_use]
    pub fn config(&self) -> &OtpApiConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_overrides() {
        let config = OtpApiConfig::new("https://app.sezamo.dev".to_string());
        assert_eq!(config.session_ttl_seconds(), 60 * 60 * 24);
        assert_eq!(config.frontend_base_url(), "https://app.sezamo.dev");

        let config = config.with_session_ttl_seconds(600);
        assert_eq!(config.session_ttl_seconds(), 600);
    }

    #[test]
    fn secure_cookie_tracks_the_frontend_scheme() {
        let https = OtpApiConfig::new("https://app.sezamo.dev".to_string());
        assert!(https.session_cookie_secure());

        let http = OtpApiConfig::new("http://localhost:3000".to_string());
        assert!(!http.session_cookie_secure());
    }
}
