//! Shared helpers for gateway integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use payhook::gateway::{self, state::AppState};
use payhook::ingest::{IngestCoordinator, TransactionStore};

pub struct TestApp {
    pub router: Router,
    pub coordinator: Arc<IngestCoordinator>,
}

impl TestApp {
    pub fn new(store: Arc<dyn TransactionStore>, finalize_delay: Duration) -> Self {
        let coordinator = Arc::new(IngestCoordinator::new(store, finalize_delay));
        let state = Arc::new(AppState::new(coordinator.clone()));
        Self {
            router: gateway::router(state),
            coordinator,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn post_webhook(&self, payload: &Value) -> Response<Body> {
        self.post_raw(payload.to_string(), "application/json").await
    }

    pub async fn post_raw(&self, body: String, content_type: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/v1/webhooks/transactions")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// GET a transaction and return (status, json body)
    pub async fn get_transaction(&self, id: &str) -> (StatusCode, Value) {
        let response = self.get(&format!("/v1/transactions/{}", id)).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub fn payload(id: &str) -> Value {
    json!({
        "transaction_id": id,
        "source_account": "acc_user_001",
        "destination_account": "acc_merchant_001",
        "amount": 2500.50,
        "currency": "USD"
    })
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
