//! Verify endpoint: code redemption and session cookie issuance.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, info};

use super::session::session_cookie;
use super::state::OtpState;
use super::types::{ErrorResponse, VerifyCodeRequest, VerifyCodeResponse};
use super::{error_response, missing_payload_response};

/// Redeem a 6-digit code and establish the session.
#[utoipa::path(
    post,
    path = "/v1/auth/otp/verify",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Code redeemed, session cookie set", body = VerifyCodeResponse),
        (status = 400, description = "Malformed email or code", body = ErrorResponse),
        (status = 401, description = "Expired or invalid code", body = ErrorResponse),
        (status = 429, description = "Verify quota exhausted", body = ErrorResponse),
        (status = 502, description = "Identity provider unavailable", body = ErrorResponse)
    ),
    tag = "otp"
)]
pub async fn verify_code(
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<VerifyCodeRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return missing_payload_response();
    };

    match state
        .service()
        .verify_code(&request.email, &request.otp)
        .await
    {
        Ok(success) => {
            info!(redirect_path = %success.redirect_path, "sign-in code redeemed");
            let mut headers = HeaderMap::new();
            match session_cookie(state.config(), &success.session_token) {
                Ok(cookie) => {
                    headers.insert(SET_COOKIE, cookie);
                }
                Err(err) => {
                    // The provider token should always be header-safe.
                    error!("failed to build session cookie: {err}");
                }
            }
            let response = VerifyCodeResponse {
                success: true,
                redirect_path: success.redirect_path,
            };
            (StatusCode::OK, headers, Json(response)).into_response()
        }
        Err(err) => error_response(&err),
    }
}
