//! cablecheck-dv library interface
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use cablecheck_common::config::ValidationPolicy;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::OracleApi;

/// Application state shared across handlers
///
/// The oracle handle is a plain injected dependency created once at process
/// start; no per-request mutable state lives here.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Long-lived reasoning-oracle collaborator handle
    pub oracle: Arc<dyn OracleApi>,
    /// Response-normalization strictness, fixed at startup
    pub policy: ValidationPolicy,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, oracle: Arc<dyn OracleApi>, policy: ValidationPolicy) -> Self {
        Self {
            db,
            oracle,
            policy,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::validate_routes())
        .merge(api::design_record_routes())
        .merge(api::settings_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
