//! Member registration and lookup routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use moneta_core::NewMember;
use moneta_shared::types::{IdParseError, MemberId};
use serde_json::json;

use super::accounts::AccountResponse;
use crate::AppState;
use crate::response::{ApiError, ApiResult, ok, respond};

/// Creates the member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(register_member))
        .route("/members/count", get(count_members))
        .route("/members/{id}", get(get_member))
        .route("/members/{id}/accounts", get(list_member_accounts))
}

pub(crate) fn parse_member_id(raw: &str) -> Result<MemberId, ApiError> {
    raw.parse()
        .map_err(|e: IdParseError| ApiError::bad_request(e.to_string()))
}

/// GET `/members` - List all members.
async fn list_members(State(state): State<AppState>) -> ApiResult {
    let members = state.bank.members().await?;
    Ok(ok("Members retrieved successfully", members))
}

/// POST `/members` - Register a member.
async fn register_member(
    State(state): State<AppState>,
    payload: Result<Json<NewMember>, JsonRejection>,
) -> ApiResult {
    let Json(input) = payload?;
    let member = state.bank.register_member(input).await?;
    Ok(respond(
        StatusCode::CREATED,
        "Member registered successfully",
        member,
    ))
}

/// GET `/members/count`
async fn count_members(State(state): State<AppState>) -> ApiResult {
    let count = state.bank.member_count().await?;
    Ok(ok("Member count retrieved", json!({ "count": count })))
}

/// GET `/members/{id}`
async fn get_member(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let member = state.bank.member(parse_member_id(&id)?).await?;
    Ok(ok("Member retrieved successfully", member))
}

/// GET `/members/{id}/accounts` - Accounts owned by a member.
async fn list_member_accounts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let accounts = state.bank.member_accounts(parse_member_id(&id)?).await?;
    let data: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(ok("Member accounts retrieved successfully", data))
}
