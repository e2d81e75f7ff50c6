//! Router harness for handler tests.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use moneta_core::{BankService, InMemoryStore};
use moneta_shared::LedgerConfig;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

pub struct TestApp {
    pub store: InMemoryStore,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let bank = BankService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            LedgerConfig::default(),
        );
        let router = create_router(AppState::new(bank), Duration::from_secs(5));
        Self { store, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Registers a member and returns its id.
    pub async fn member(&self, email: &str) -> String {
        let (status, body) = self
            .send(post(
                "/api/v1/members",
                &serde_json::json!({
                    "name": "Api Member",
                    "email": email,
                    "phone_number": "+62 811 5555 0000"
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Opens an account and returns its number.
    pub async fn account(&self, member_id: &str, initial_balance: &str) -> String {
        let (status, body) = self
            .send(post(
                "/api/v1/accounts",
                &serde_json::json!({
                    "member_id": member_id,
                    "initial_balance": initial_balance
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["account_number"].as_str().unwrap().to_string()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
