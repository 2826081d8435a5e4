//! Integration tests for CloudMart.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no server or database needed)
//! cargo test -p cloudmart-integration-tests
//!
//! # Live server tests
//! cargo run -p cloudmart-api &
//! cargo test -p cloudmart-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `api_flow` - End-to-end HTTP flows over an in-memory store
//! - `store_failures` - Behavior with no store and with a failing store
//! - `live_server` - Same flows against a running server (ignored by default)

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use cloudmart_api::config::ApiConfig;
use cloudmart_api::db::DocumentStore;
use cloudmart_api::db::memory::InMemoryStore;
use cloudmart_api::db::seed::seed_catalog;
use cloudmart_api::routes;
use cloudmart_api::state::AppState;

/// Response parts the tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// The API router wired to a chosen store, driven in-process.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// App over an in-memory store seeded with the demo catalog.
    pub async fn seeded() -> Self {
        let store = InMemoryStore::new();
        seed_catalog(&store).await.unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        Self::with_store(Some(store))
    }

    /// App over the given store (or none).
    #[must_use]
    pub fn with_store(store: Option<Arc<dyn DocumentStore>>) -> Self {
        let config = ApiConfig {
            deployed_via: "test".to_string(),
            ..ApiConfig::default()
        };
        Self {
            router: routes::app(AppState::new(config, store)),
        }
    }

    /// Send a request and collect the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = read_json(response).await;
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Log in with the demo account and return the access token.
    pub async fn login(&self) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/auth/login",
                &serde_json::json!({"username": "demo", "password": "demo123"}),
                None,
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["access_token"].as_str().unwrap().to_string()
    }
}

/// Build a request with a JSON body.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a request without a body.
#[must_use]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON. Empty bodies read as `null`.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
