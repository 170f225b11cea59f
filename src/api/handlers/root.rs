//! Undocumented `/` handler.

use axum::response::IntoResponse;

/// Plain-text service banner for the bare root path.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn root_returns_the_banner() {
        let response = root().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
