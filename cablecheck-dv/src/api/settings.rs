//! Runtime settings endpoint
//!
//! Lets an operator configure the oracle API key without restarting: the key
//! is written to the settings table (the authoritative resolution tier) and
//! mirrored into the TOML config file so the next cold start finds it too.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/settings/oracle_api_key
///
/// Rejects blank keys with 400; a database write failure is 500. The TOML
/// mirror is best-effort and never fails the request.
pub async fn set_oracle_api_key(
    State(state): State<AppState>,
    Json(payload): Json<SetApiKeyRequest>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    if !crate::config::is_valid_key(&payload.api_key) {
        return Err(ApiError::BadRequest(
            "API key cannot be empty or whitespace-only".to_string(),
        ));
    }

    crate::db::settings::set_oracle_api_key(&state.db, payload.api_key.clone())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save API key to database: {}", e)))?;
    info!("Oracle API key configured via settings API");

    let toml_path = cablecheck_common::config::config_file_path("cablecheck-dv");
    crate::config::sync_api_key_to_toml(&payload.api_key, &toml_path);

    Ok(Json(SetApiKeyResponse {
        success: true,
        message: "Oracle API key configured successfully".to_string(),
    }))
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/api/settings/oracle_api_key", post(set_oracle_api_key))
}
