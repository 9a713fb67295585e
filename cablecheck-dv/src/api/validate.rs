//! Design validation endpoint

use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{ValidateDesignRequest, ValidationReport};
use crate::services::DesignValidator;
use crate::{ApiError, ApiResult, AppState};

/// POST /design/validate
///
/// Runs the full pipeline: input selection → payload normalization → oracle
/// call → response normalization → report assembly. The validator is built
/// fresh per request; all state it touches lives in the injected handles.
pub async fn validate_design(
    State(state): State<AppState>,
    Json(payload): Json<ValidateDesignRequest>,
) -> ApiResult<Json<ValidationReport>> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "Design validation requested");

    let validator = DesignValidator::new(state.db.clone(), state.oracle.clone(), state.policy);

    match validator.validate(&payload).await {
        Ok(report) => {
            info!(
                %request_id,
                source = report.input_source.as_str(),
                overall = report.overall_status.as_str(),
                confidence = report.confidence,
                "Design validation completed"
            );
            Ok(Json(report))
        }
        Err(e) => {
            warn!(%request_id, error = %e, "Design validation failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(ApiError::from(e))
        }
    }
}

/// Build validation routes
pub fn validate_routes() -> Router<AppState> {
    Router::new().route("/design/validate", post(validate_design))
}
