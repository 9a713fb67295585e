//! Stored design record endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use cablecheck_common::DesignFields;

use crate::db;
use crate::{ApiError, ApiResult, AppState};

/// GET /design/:design_id
///
/// Read-only view of a stored record, identity keys included.
pub async fn get_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
) -> ApiResult<Json<DesignFields>> {
    let record = db::designs::fetch_design(&state.db, &design_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Design ID not found: {}", design_id)))?;

    Ok(Json(record))
}

/// Build design record routes
pub fn design_record_routes() -> Router<AppState> {
    Router::new().route("/design/:design_id", get(get_design))
}
