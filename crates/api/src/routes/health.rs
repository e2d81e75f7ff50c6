//! Liveness endpoint.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::warn;

use crate::AppState;
use crate::response::{ApiError, respond};

/// Health payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always `healthy`; failures use the error envelope.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// GET `/health` - Probes the ledger store with a cheap count.
async fn health_check(State(state): State<AppState>) -> Response {
    match state.bank.account_count().await {
        Ok(_) => respond(
            StatusCode::OK,
            "Service is healthy",
            HealthStatus {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
            },
        ),
        Err(e) => {
            warn!(error = %e, "Health probe failed");
            ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Ledger store unreachable",
            )
            .into_response()
        }
    }
}

/// Creates health routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{TestApp, get};

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let app = TestApp::new();
        let (status, body) = app.send(get("/api/v1/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }
}
