//! OTP sign-in endpoints: send, verify, resend.

pub mod send;
pub mod session;
pub mod state;
pub mod types;
pub mod verify;

pub use state::{OtpApiConfig, OtpState};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::otp::OtpError;

use types::ErrorResponse;

/// HTTP status for each bucket of the error taxonomy.
const fn error_status(err: &OtpError) -> StatusCode {
    match err {
        OtpError::Validation(_) => StatusCode::BAD_REQUEST,
        OtpError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        OtpError::Expired | OtpError::InvalidCode => StatusCode::UNAUTHORIZED,
        OtpError::Transient(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Render a domain error as the shared error envelope.
pub(super) fn error_response(err: &OtpError) -> Response {
    let body = ErrorResponse {
        success: false,
        error: err.code().to_string(),
        message: err.to_string(),
        cooldown_seconds: err.cooldown_seconds(),
    };
    (error_status(err), Json(body)).into_response()
}

/// Bodyless requests are a validation failure, not a transport error.
pub(super) fn missing_payload_response() -> Response {
    error_response(&OtpError::Validation("Missing payload".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            error_status(&OtpError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&OtpError::RateLimited {
                cooldown_seconds: 60
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(error_status(&OtpError::Expired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            error_status(&OtpError::InvalidCode),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_status(&OtpError::Transient("boom".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn error_response_carries_the_envelope() {
        let response = error_response(&OtpError::RateLimited {
            cooldown_seconds: 90,
        });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn missing_payload_is_a_bad_request() {
        let response = missing_payload_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
