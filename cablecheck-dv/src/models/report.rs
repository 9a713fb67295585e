//! Validation report assembled from the normalized oracle verdict

use cablecheck_common::{DesignFields, FieldStatus, InputSource, OverallStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One validation entry joined with the value the oracle saw for that field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResult {
    pub field: String,
    /// Value from the canonical field set (null when the oracle reported a
    /// field it was not given)
    pub provided: Value,
    pub expected: Value,
    pub status: FieldStatus,
    pub comment: String,
}

/// Final validation report returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Provenance of the validated payload (audit only)
    pub input_source: InputSource,
    pub fields: DesignFields,
    pub results: Vec<FieldResult>,
    /// PASS iff every entry passed; WARN entries fail the roll-up
    pub overall_status: OverallStatus,
    /// Normalized to the 0–1 scale
    pub confidence: f64,
}
