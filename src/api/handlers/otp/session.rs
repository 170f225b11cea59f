//! Session cookie forwarding.
//!
//! The identity provider mints the session token; this module only shapes
//! it into an `HttpOnly` cookie. There is no server-side session store.

use axum::http::{HeaderValue, header::InvalidHeaderValue};

use super::state::OtpApiConfig;

const SESSION_COOKIE_NAME: &str = "sezamo_session";

/// Build the `Set-Cookie` value for a provider-issued session token.
///
/// # Errors
/// Returns an error when the token produces an invalid header value.
pub(super) fn session_cookie(
    config: &OtpApiConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    // Only mark cookies secure when the frontend is served over HTTPS.
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn cookie_is_http_only_lax_and_scoped_to_root() -> Result<()> {
        let config =
            OtpApiConfig::new("http://localhost:3000".to_string()).with_session_ttl_seconds(600);
        let cookie = session_cookie(&config, "token-123")?;
        let value = cookie.to_str()?;

        assert!(value.starts_with("sezamo_session=token-123;"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=600"));
        assert!(!value.contains("Secure"));
        Ok(())
    }

    #[test]
    fn https_frontend_marks_the_cookie_secure() -> Result<()> {
        let config = OtpApiConfig::new("https://app.sezamo.dev".to_string());
        let cookie = session_cookie(&config, "token-123")?;
        assert!(cookie.to_str()?.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn control_characters_in_tokens_are_rejected() {
        let config = OtpApiConfig::new("https://app.sezamo.dev".to_string());
        assert!(session_cookie(&config, "bad\ntoken").is_err());
    }
}
