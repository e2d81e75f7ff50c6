//! Account routes: opening, lookups, totals, and money movements.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use moneta_core::{
    Account, AccountStatus, DepositRequest, TransferRequest, WithdrawalRequest,
};
use moneta_shared::types::{AccountId, MemberId, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;
use crate::response::{ApiResult, ok, respond};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(open_account))
        .route("/accounts/count", get(count_accounts))
        .route("/accounts/total-balance", get(total_balance))
        .route("/accounts/transactions/count", get(count_transactions))
        .route("/accounts/number/{account_number}", get(get_account))
        .route("/accounts/transfer", post(transfer))
        .route("/accounts/{account_number}/deposit", post(deposit))
        .route("/accounts/{account_number}/withdraw", post(withdraw))
        .route(
            "/accounts/{account_number}/transactions",
            get(account_transactions),
        )
}

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
pub struct OpenAccountRequest {
    /// Owning member.
    pub member_id: MemberId,
    /// Opening balance, at least the configured minimum.
    pub initial_balance: Decimal,
}

/// Request body for deposits and withdrawals on a path-addressed account.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    /// Amount to move.
    pub amount: Decimal,
    /// Optional note stored on the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Internal identifier.
    pub id: AccountId,
    /// 16-digit account number.
    pub account_number: String,
    /// Owning member.
    pub member_id: MemberId,
    /// Current balance, serialized as a string.
    pub balance: Decimal,
    /// Account status.
    pub status: AccountStatus,
    /// Opening time.
    pub created_at: DateTime<Utc>,
    /// Last balance change.
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            balance: account.balance(),
            account_number: account.account_number.into(),
            member_id: account.member_id,
            status: account.status,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// GET `/accounts` - List all accounts ordered by number.
async fn list_accounts(State(state): State<AppState>) -> ApiResult {
    let accounts = state.bank.accounts().await?;
    let data: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(ok("Accounts retrieved successfully", data))
}

/// POST `/accounts` - Open an account for a member.
async fn open_account(
    State(state): State<AppState>,
    payload: Result<Json<OpenAccountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let account = state
        .bank
        .open_account(request.member_id, request.initial_balance)
        .await?;
    Ok(respond(
        StatusCode::CREATED,
        "Account opened successfully",
        AccountResponse::from(account),
    ))
}

/// GET `/accounts/count`
async fn count_accounts(State(state): State<AppState>) -> ApiResult {
    let count = state.bank.account_count().await?;
    Ok(ok("Account count retrieved", json!({ "count": count })))
}

/// GET `/accounts/total-balance` - Sum over active accounts.
async fn total_balance(State(state): State<AppState>) -> ApiResult {
    let total = state.bank.total_balance().await?;
    Ok(ok(
        "Total balance retrieved",
        json!({ "total_balance": total }),
    ))
}

/// GET `/accounts/transactions/count`
async fn count_transactions(State(state): State<AppState>) -> ApiResult {
    let count = state.bank.transaction_count().await?;
    Ok(ok("Transaction count retrieved", json!({ "count": count })))
}

/// GET `/accounts/number/{account_number}`
async fn get_account(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> ApiResult {
    let account = state.bank.account(&account_number).await?;
    Ok(ok(
        "Account retrieved successfully",
        AccountResponse::from(account),
    ))
}

/// POST `/accounts/transfer` - Move money between two accounts.
async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let transaction = state.bank.transfer(request).await?;
    Ok(respond(
        StatusCode::CREATED,
        "Transfer completed successfully",
        transaction,
    ))
}

/// POST `/accounts/{account_number}/deposit`
async fn deposit(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    payload: Result<Json<MovementRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = payload?;
    let transaction = state
        .bank
        .deposit(DepositRequest {
            account: account_number,
            amount: body.amount,
            description: body.description,
        })
        .await?;
    Ok(respond(
        StatusCode::CREATED,
        "Deposit completed successfully",
        transaction,
    ))
}

/// POST `/accounts/{account_number}/withdraw`
async fn withdraw(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    payload: Result<Json<MovementRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = payload?;
    let transaction = state
        .bank
        .withdraw(WithdrawalRequest {
            account: account_number,
            amount: body.amount,
            description: body.description,
        })
        .await?;
    Ok(respond(
        StatusCode::CREATED,
        "Withdrawal completed successfully",
        transaction,
    ))
}

/// GET `/accounts/{account_number}/transactions?page&per_page` - Most recent first.
async fn account_transactions(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> ApiResult {
    let Query(page) = query?;
    let history = state
        .bank
        .account_history(&account_number, page.normalized())
        .await?;
    Ok(ok("Transactions retrieved successfully", history))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::test_support::{TestApp, get, post};

    async fn funded_pair(app: &TestApp) -> (String, String) {
        let member = app.member("pair@example.com").await;
        let a = app.account(&member, "100000.00").await;
        let b = app.account(&member, "50000.00").await;
        (a, b)
    }

    async fn balance(app: &TestApp, number: &str) -> Value {
        let (_, body) = app
            .send(get(&format!("/api/v1/accounts/number/{number}")))
            .await;
        body["data"]["balance"].clone()
    }

    #[tokio::test]
    async fn test_open_account_envelope() {
        let app = TestApp::new();
        let member = app.member("open@example.com").await;

        let (status, body) = app
            .send(post(
                "/api/v1/accounts",
                &json!({ "member_id": member, "initial_balance": "1500" }),
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["balance"], "1500.00");
        assert_eq!(body["data"]["status"], "ACTIVE");
        let number = body["data"]["account_number"].as_str().unwrap();
        assert_eq!(number.len(), 16);
        assert!(number.starts_with("3333"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_open_account_below_minimum() {
        let app = TestApp::new();
        let member = app.member("low@example.com").await;

        let (status, body) = app
            .send(post(
                "/api/v1/accounts",
                &json!({ "member_id": member, "initial_balance": "999.99" }),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BELOW_MINIMUM_OPENING_BALANCE");
    }

    #[tokio::test]
    async fn test_transfer_moves_money() {
        let app = TestApp::new();
        let (a, b) = funded_pair(&app).await;

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": a, "to_account_number": b, "amount": "10000.00", "description": "rent" }),
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["transaction_type"], "TRANSFER");
        assert_eq!(body["data"]["status"], "COMPLETED");
        assert_eq!(body["data"]["amount"], "10000.00");
        assert_eq!(body["data"]["from_account"], a.as_str());
        assert_eq!(balance(&app, &a).await, "90000.00");
        assert_eq!(balance(&app, &b).await, "60000.00");

        let id = body["data"]["id"].as_str().unwrap();
        let (status, body) = app.send(get(&format!("/api/v1/transactions/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["description"], "rent");
    }

    #[tokio::test]
    async fn test_transfer_failures_map_to_statuses() {
        let app = TestApp::new();
        let (a, b) = funded_pair(&app).await;

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": a, "to_account_number": b, "amount": "200000.00" }),
            ))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "INSUFFICIENT_BALANCE");

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": a, "to_account_number": a, "amount": "1.00" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "SAME_ACCOUNT_TRANSFER");

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": "3333000000000000", "to_account_number": b, "amount": "1.00" }),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ACCOUNT_NOT_FOUND");

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": a, "to_account_number": b, "amount": "-5" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_AMOUNT");

        assert_eq!(balance(&app, &a).await, "100000.00");
        assert_eq!(balance(&app, &b).await, "50000.00");
    }

    #[tokio::test]
    async fn test_commit_failure_is_service_unavailable() {
        let app = TestApp::new();
        let (a, b) = funded_pair(&app).await;
        app.store.fail_next_commit();

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": a, "to_account_number": b, "amount": "1.00" }),
            ))
            .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "DURABILITY_FAILURE");
        assert_eq!(balance(&app, &a).await, "100000.00");
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw() {
        let app = TestApp::new();
        let (a, _) = funded_pair(&app).await;

        let (status, body) = app
            .send(post(
                &format!("/api/v1/accounts/{a}/deposit"),
                &json!({ "amount": "250.50" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["transaction_type"], "DEPOSIT");
        assert_eq!(body["data"]["from_account"], Value::Null);

        let (status, body) = app
            .send(post(
                &format!("/api/v1/accounts/{a}/withdraw"),
                &json!({ "amount": "0.50", "description": "atm" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["transaction_type"], "WITHDRAWAL");

        assert_eq!(balance(&app, &a).await, "100250.00");
    }

    #[tokio::test]
    async fn test_oversized_deposit_is_bad_request() {
        let app = TestApp::new();
        let (a, _) = funded_pair(&app).await;

        let (status, body) = app
            .send(post(
                &format!("/api/v1/accounts/{a}/deposit"),
                &json!({ "amount": "792281625142643375935439503.00" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_AMOUNT");
        assert_eq!(balance(&app, &a).await, "100000.00");
    }

    #[tokio::test]
    async fn test_transfer_accepts_camel_case_fields() {
        let app = TestApp::new();
        let (a, b) = funded_pair(&app).await;

        let (status, body) = app
            .send(post(
                "/api/v1/accounts/transfer",
                &json!({ "fromAccountNumber": a, "toAccountNumber": b, "amount": "5.00" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["transaction_type"], "TRANSFER");
        assert_eq!(balance(&app, &a).await, "99995.00");
    }

    #[tokio::test]
    async fn test_history_paginates_newest_first() {
        let app = TestApp::new();
        let (a, b) = funded_pair(&app).await;
        for _ in 0..3 {
            app.send(post(
                "/api/v1/accounts/transfer",
                &json!({ "from_account_number": a, "to_account_number": b, "amount": "1.00" }),
            ))
            .await;
        }

        let (status, body) = app
            .send(get(&format!(
                "/api/v1/accounts/{a}/transactions?page=1&per_page=2"
            )))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["meta"]["total"], 4);
        assert_eq!(body["data"]["meta"]["total_pages"], 2);
        assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["data"][0]["transaction_type"], "TRANSFER");

        let (_, body) = app
            .send(get(&format!(
                "/api/v1/accounts/{a}/transactions?page=2&per_page=2"
            )))
            .await;
        assert_eq!(body["data"]["data"][1]["transaction_type"], "DEPOSIT");
    }

    #[tokio::test]
    async fn test_history_of_unknown_account() {
        let app = TestApp::new();
        let (status, body) = app
            .send(get("/api/v1/accounts/3333123412341234/transactions"))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ACCOUNT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_totals() {
        let app = TestApp::new();
        funded_pair(&app).await;

        let (_, body) = app.send(get("/api/v1/accounts/count")).await;
        assert_eq!(body["data"]["count"], 2);

        let (_, body) = app.send(get("/api/v1/accounts/total-balance")).await;
        assert_eq!(body["data"]["total_balance"], "150000.00");

        let (_, body) = app.send(get("/api/v1/accounts/transactions/count")).await;
        assert_eq!(body["data"]["count"], 2);

        let (_, body) = app.send(get("/api/v1/accounts")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }
}
