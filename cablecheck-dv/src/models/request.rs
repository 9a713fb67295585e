//! Validation request body
//!
//! Exactly one of the three input channels must be provided; the input
//! selector enforces this before any other component touches the request.

use cablecheck_common::DesignFields;
use serde::{Deserialize, Serialize};

/// POST /design/validate request body
///
/// All channels are optional at the deserialization layer; channel-count
/// enforcement is a pipeline concern, not a framework concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDesignRequest {
    /// Identifier of a stored cable design record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_id: Option<String>,

    /// Structured field set, passed through unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_input: Option<DesignFields>,

    /// Free-text description, run through the text extractor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
}
