//! Health probe handlers.
//!
//! Three probe endpoints:
//! - `/live`: process liveness only (no dependency checks)
//! - `/ready`: provider-aware readiness for orchestrators
//! - `/health`: provider-aware status with detailed JSON payload

use crate::GIT_COMMIT_HASH;
use crate::api::handlers::otp::OtpState;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    identity_provider: String,
}

#[utoipa::path(
    get,
    path = "/live",
    responses(
        (status = 200, description = "Process is alive")
    ),
    tag = "health",
)]
/// Report process liveness without checking external dependencies.
pub async fn live() -> impl IntoResponse {
    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service is ready to receive traffic"),
        (status = 503, description = "Identity provider is not reachable")
    ),
    tag = "health",
)]
/// Report readiness based on the identity provider dependency.
pub async fn ready(state: Extension<Arc<OtpState>>) -> impl IntoResponse {
    let status = state.service().provider().dependency_status().await;
    debug!(provider = status.as_str(), "readiness probe");

    if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Identity provider dependency is healthy", body = Health),
        (status = 503, description = "Identity provider dependency is unhealthy", body = Health)
    ),
    tag = "health",
)]
/// Perform a detailed health check, reporting the provider dependency.
pub async fn health(method: Method, state: Extension<Arc<OtpState>>) -> impl IntoResponse {
    let status = state.service().provider().dependency_status().await;

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        identity_provider: status.as_str().to_string(),
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();
            headers.insert("X-App", x_app_header_value);
            headers
        })
        .map_err(|err| {
            debug!("Failed to parse X-App header: {}", err);
        })
        .unwrap_or_else(|()| HeaderMap::new());

    if status.is_healthy() {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}
