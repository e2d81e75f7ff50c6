//! Transaction lookup.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use moneta_shared::types::{IdParseError, TransactionId};

use crate::AppState;
use crate::response::{ApiError, ApiResult, ok};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions/{id}", get(get_transaction))
}

/// GET `/transactions/{id}`
async fn get_transaction(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let id: TransactionId = id
        .parse()
        .map_err(|e: IdParseError| ApiError::bad_request(e.to_string()))?;
    let transaction = state.bank.transaction(id).await?;
    Ok(ok("Transaction retrieved successfully", transaction))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{TestApp, get};

    #[tokio::test]
    async fn test_unknown_transaction() {
        let app = TestApp::new();
        let (status, body) = app
            .send(get("/api/v1/transactions/0190b6a4-0000-7000-8000-000000000001"))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "TRANSACTION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_transaction_id() {
        let app = TestApp::new();
        let (status, _) = app.send(get("/api/v1/transactions/xyz")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
