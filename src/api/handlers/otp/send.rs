//! Send and resend endpoints.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::info;

use super::state::OtpState;
use super::types::{ErrorResponse, SendCodeRequest, SendCodeResponse};
use super::{error_response, missing_payload_response};

/// Dispatch a sign-in code to an email address.
#[utoipa::path(
    post,
    path = "/v1/auth/otp/send",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "Code dispatched", body = SendCodeResponse),
        (status = 400, description = "Invalid email address", body = ErrorResponse),
        (status = 429, description = "Send quota exhausted", body = ErrorResponse),
        (status = 502, description = "Identity provider unavailable", body = ErrorResponse)
    ),
    tag = "otp"
)]
pub async fn send_code(
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<SendCodeRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return missing_payload_response();
    };

    match state.service().send_code(&request.email).await {
        Ok(confirmation) => {
            info!("sign-in code dispatched");
            let response = SendCodeResponse {
                success: true,
                message: confirmation.message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// Re-deliver a sign-in code under the stricter resend quota.
#[utoipa::path(
    post,
    path = "/v1/auth/otp/resend",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "New code dispatched", body = SendCodeResponse),
        (status = 400, description = "Invalid email address", body = ErrorResponse),
        (status = 429, description = "Resend quota exhausted", body = ErrorResponse),
        (status = 502, description = "Identity provider unavailable", body = ErrorResponse)
    ),
    tag = "otp"
)]
pub async fn resend_code(
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<SendCodeRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return missing_payload_response();
    };

    match state.service().resend_code(&request.email).await {
        Ok(confirmation) => {
            info!("sign-in code re-dispatched");
            let response = SendCodeResponse {
                success: true,
                message: confirmation.message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(&err),
    }
}
