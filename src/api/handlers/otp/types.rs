//! Request/response types for the OTP endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub otp: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub redirect_path: String,
}

/// Error envelope shared by every OTP endpoint: a stable machine code, a
/// user-facing message, and a wait hint for rate-limit failures.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn verify_request_round_trips() -> Result<()> {
        let request = VerifyCodeRequest {
            email: "alice@example.com".to_string(),
            otp: "123456".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let otp = value
            .get("otp")
            .and_then(serde_json::Value::as_str)
            .context("missing otp")?;
        assert_eq!(otp, "123456");
        let decoded: VerifyCodeRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.email, "alice@example.com");
        Ok(())
    }

    #[test]
    fn error_envelope_omits_absent_cooldown() -> Result<()> {
        let error = ErrorResponse {
            success: false,
            error: "invalid_code_error".to_string(),
            message: "Invalid code. Please check and try again.".to_string(),
            cooldown_seconds: None,
        };
        let value = serde_json::to_value(&error)?;
        assert!(value.get("cooldown_seconds").is_none());

        let error = ErrorResponse {
            cooldown_seconds: Some(120),
            ..error
        };
        let value = serde_json::to_value(&error)?;
        assert_eq!(
            value.get("cooldown_seconds").and_then(serde_json::Value::as_u64),
            Some(120)
        );
        Ok(())
    }
}
