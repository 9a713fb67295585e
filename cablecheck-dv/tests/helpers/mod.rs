//! Shared test helpers: in-memory app state and a scripted oracle stub
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use cablecheck_common::config::ValidationPolicy;
use cablecheck_dv::services::{OracleApi, OracleError};
use cablecheck_dv::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Oracle stub with a canned reply or a canned failure
pub struct StubOracle {
    reply: Result<String, OracleError>,
}

impl StubOracle {
    /// Stub that replies with the given raw text
    pub fn replying(raw: &str) -> Arc<dyn OracleApi> {
        Arc::new(Self {
            reply: Ok(raw.to_string()),
        })
    }

    /// Stub that fails every call with a transport error
    pub fn unreachable() -> Arc<dyn OracleApi> {
        Arc::new(Self {
            reply: Err(OracleError::NetworkError("connection refused".to_string())),
        })
    }
}

#[async_trait]
impl OracleApi for StubOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
        match &self.reply {
            Ok(raw) => Ok(raw.clone()),
            Err(OracleError::NetworkError(msg)) => {
                Err(OracleError::NetworkError(msg.clone()))
            }
            Err(_) => Err(OracleError::NetworkError("stub failure".to_string())),
        }
    }
}

/// Create test app state with an in-memory database and the given oracle
pub async fn test_app_state(oracle: Arc<dyn OracleApi>) -> AppState {
    let db_pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
    cablecheck_dv::db::init_schema(&db_pool).await.unwrap();
    AppState::new(db_pool, oracle, ValidationPolicy::Strict)
}

/// One-shot a JSON POST through the router
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// One-shot a GET through the router
pub async fn get(app: Router, uri: &str) -> Response<axum::body::Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON
pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
