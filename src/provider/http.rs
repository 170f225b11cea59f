//! HTTP client for a remote identity provider.
//!
//! The remote contract is small: `POST /v1/otp/send`, `POST /v1/otp/verify`,
//! and a `GET /health` probe for dependency status. Failure statuses map
//! onto [`ProviderError`] before the service translates them for users.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{Instrument, info_span, warn};
use url::Url;

use super::{DependencyStatus, ProviderError, VerifiedIdentity};

#[derive(Serialize)]
struct SendCodeBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyCodeBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct VerifyCodeResponse {
    session_token: String,
    #[serde(default)]
    profile_complete: bool,
    #[serde(default)]
    organization_member: bool,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    retry_after_seconds: Option<u64>,
}

#[derive(Debug)]
pub struct HttpIdentityClient {
    base_url: String,
    client: Client,
    api_token: Option<SecretString>,
}

impl HttpIdentityClient {
    /// Build a client for the provider at `url`.
    ///
    /// # Errors
    /// Returns an error for a non-http(s) URL or when the HTTP client
    /// cannot be constructed.
    pub fn new(url: &str, api_token: Option<SecretString>, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(url).context("Invalid identity provider URL")?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            anyhow::bail!("Identity provider URL must use http or https: {url}");
        }
        if parsed.scheme() == "http" {
            warn!(url = %url, "identity provider URL is not https");
        }
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build identity provider HTTP client")?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            client,
            api_token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.post(self.endpoint(path));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }
        request
    }

    /// Ask the provider to dispatch a code to `email`.
    ///
    /// # Errors
    /// `Throttled` on 429, `RejectedAddress` on 400/422, `Unavailable`
    /// otherwise.
    pub async fn send_code(&self, email: &str) -> Result<(), ProviderError> {
        let response = self
            .post("/v1/otp/send")
            .json(&SendCodeBody { email })
            .send()
            .instrument(info_span!("identity.request", http.route = "/v1/otp/send"))
            .await
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let retry_after = retry_after_seconds(&response);
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(map_send_failure(status, retry_after, &body))
    }

    /// Redeem `code` for `email`.
    ///
    /// # Errors
    /// `CodeExpired` on 410, `CodeInvalid` on 400/401/403/422, `Throttled`
    /// on 429, `Unavailable` otherwise or on a malformed success body.
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<VerifiedIdentity, ProviderError> {
        let response = self
            .post("/v1/otp/verify")
            .json(&VerifyCodeBody { email, code })
            .send()
            .instrument(info_span!(
                "identity.request",
                http.route = "/v1/otp/verify"
            ))
            .await
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: VerifyCodeResponse = response.json().await.map_err(|err| {
                ProviderError::Unavailable(format!("invalid provider response: {err}"))
            })?;
            return Ok(VerifiedIdentity {
                session_token: body.session_token,
                profile_complete: body.profile_complete,
                organization_member: body.organization_member,
            });
        }
        let retry_after = retry_after_seconds(&response);
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(map_verify_failure(status, retry_after, &body))
    }

    /// Probe `GET /health` for the `/health` dependency report.
    pub async fn dependency_status(&self) -> DependencyStatus {
        let url = self.endpoint("/health");
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => DependencyStatus::Ok,
            Ok(response) => {
                warn!(
                    url = %url,
                    status = %response.status(),
                    "identity provider health probe failed"
                );
                DependencyStatus::Error
            }
            Err(err) => {
                warn!(
                    url = %url,
                    error = %err,
                    "identity provider unreachable during health check"
                );
                DependencyStatus::Error
            }
        }
    }
}

fn retry_after_seconds(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn map_send_failure(status: StatusCode, retry_after: Option<u64>, body: &ErrorBody) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::Throttled {
            retry_after_seconds: retry_after.or(body.retry_after_seconds),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::RejectedAddress(
                body.message
                    .clone()
                    .unwrap_or_else(|| "address rejected".to_string()),
            )
        }
        _ => ProviderError::Unavailable(failure_detail(status, body)),
    }
}

fn map_verify_failure(
    status: StatusCode,
    retry_after: Option<u64>,
    body: &ErrorBody,
) -> ProviderError {
    match status {
        StatusCode::GONE => ProviderError::CodeExpired,
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::UNPROCESSABLE_ENTITY => ProviderError::CodeInvalid,
        StatusCode::TOO_MANY_REQUESTS => ProviderError::Throttled {
            retry_after_seconds: retry_after.or(body.retry_after_seconds),
        },
        _ => ProviderError::Unavailable(failure_detail(status, body)),
    }
}

fn failure_detail(status: StatusCode, body: &ErrorBody) -> String {
    match &body.message {
        Some(message) => format!("provider returned {status}: {message}"),
        None => format!("provider returned {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_trailing_slash() {
        let client =
            HttpIdentityClient::new("https://id.example.com/", None, Duration::from_secs(5))
                .expect("client builds");
        assert_eq!(client.base_url(), "https://id.example.com");
        assert_eq!(
            client.endpoint("/v1/otp/send"),
            "https://id.example.com/v1/otp/send"
        );
    }

    #[test]
    fn new_rejects_non_http_schemes() {
        let result = HttpIdentityClient::new("ftp://id.example.com", None, Duration::from_secs(5));
        assert!(result.is_err());

        let result = HttpIdentityClient::new("not a url", None, Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn send_failure_mapping() {
        let body = ErrorBody::default();
        assert_eq!(
            map_send_failure(StatusCode::TOO_MANY_REQUESTS, Some(30), &body),
            ProviderError::Throttled {
                retry_after_seconds: Some(30)
            }
        );
        assert_eq!(
            map_send_failure(StatusCode::BAD_REQUEST, None, &body),
            ProviderError::RejectedAddress("address rejected".to_string())
        );
        assert!(matches!(
            map_send_failure(StatusCode::INTERNAL_SERVER_ERROR, None, &body),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn send_throttle_prefers_header_over_body() {
        let body = ErrorBody {
            message: None,
            retry_after_seconds: Some(120),
        };
        assert_eq!(
            map_send_failure(StatusCode::TOO_MANY_REQUESTS, Some(30), &body),
            ProviderError::Throttled {
                retry_after_seconds: Some(30)
            }
        );
        assert_eq!(
            map_send_failure(StatusCode::TOO_MANY_REQUESTS, None, &body),
            ProviderError::Throttled {
                retry_after_seconds: Some(120)
            }
        );
    }

    #[test]
    fn rejected_address_carries_the_provider_message() {
        let body = ErrorBody {
            message: Some("domain is blocked".to_string()),
            retry_after_seconds: None,
        };
        assert_eq!(
            map_send_failure(StatusCode::UNPROCESSABLE_ENTITY, None, &body),
            ProviderError::RejectedAddress("domain is blocked".to_string())
        );
    }

    #[test]
    fn verify_failure_mapping() {
        let body = ErrorBody::default();
        assert_eq!(
            map_verify_failure(StatusCode::GONE, None, &body),
            ProviderError::CodeExpired
        );
        assert_eq!(
            map_verify_failure(StatusCode::UNAUTHORIZED, None, &body),
            ProviderError::CodeInvalid
        );
        assert_eq!(
            map_verify_failure(StatusCode::UNPROCESSABLE_ENTITY, None, &body),
            ProviderError::CodeInvalid
        );
        assert_eq!(
            map_verify_failure(StatusCode::TOO_MANY_REQUESTS, Some(10), &body),
            ProviderError::Throttled {
                retry_after_seconds: Some(10)
            }
        );
        assert!(matches!(
            map_verify_failure(StatusCode::BAD_GATEWAY, None, &body),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn retry_after_parses_numeric_header() {
        let response = axum::http::Response::builder()
            .status(429)
            .header("retry-after", "45")
            .body("")
            .expect("response builds");
        let response = reqwest::Response::from(response);
        assert_eq!(retry_after_seconds(&response), Some(45));
    }

    #[test]
    fn retry_after_ignores_http_dates() {
        let response = axum::http::Response::builder()
            .status(429)
            .header("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT")
            .body("")
            .expect("response builds");
        let response = reqwest::Response::from(response);
        assert_eq!(retry_after_seconds(&response), None);
    }

    #[test]
    fn failure_detail_includes_message_when_present() {
        let body = ErrorBody {
            message: Some("maintenance window".to_string()),
            retry_after_seconds: None,
        };
        let detail = failure_detail(StatusCode::SERVICE_UNAVAILABLE, &body);
        assert!(detail.contains("503"));
        assert!(detail.contains("maintenance window"));
    }
}
