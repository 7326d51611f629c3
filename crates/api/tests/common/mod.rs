//! Shared helpers for API integration tests.
//!
//! Tests drive the real router (same middleware stack as production) over an
//! in-memory version store, so no database is required.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use docvault_api::auth::jwt::{generate_access_token, JwtConfig};
use docvault_api::config::ServerConfig;
use docvault_api::router::build_app_router;
use docvault_api::state::AppState;
use docvault_core::lineage::memory::MemoryVersionStore;
use docvault_core::lineage::{LineageConfig, LineageEngine};
use docvault_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-with-enough-bytes".to_string(),
            access_token_expiry_mins: 15,
        },
        lineage: LineageConfig::default(),
    }
}

/// A router plus handles on the pieces tests need to inspect.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryVersionStore>,
    pub config: ServerConfig,
}

impl TestApp {
    /// Fresh router handle; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Bearer token for a user acting in `organization_id`.
    pub fn token(&self, user_id: DbId, organization_id: DbId) -> String {
        generate_access_token(user_id, organization_id, "editor", &self.config.jwt)
            .expect("token generation should succeed")
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryVersionStore::new());
    let engine = LineageEngine::new(store.clone(), config.lineage.clone());

    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        config,
    }
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get_public(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST a body verbatim, for exercising malformed JSON.
pub async fn post_raw(app: Router, uri: &str, token: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a document through the API and return `(document_id, root_version_id)`.
pub async fn create_document(test: &TestApp, token: &str, name: &str) -> (DbId, DbId) {
    let response = post_json(
        test.app(),
        "/api/v1/documents",
        token,
        serde_json::json!({
            "name": name,
            "document_type": "policy",
            "content": {"body": "initial"}
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["data"]["document"]["id"].as_i64().unwrap(),
        json["data"]["root_version"]["id"].as_i64().unwrap(),
    )
}
