//! Payload normalization
//!
//! Resolves the one populated input channel into a canonical payload tagged
//! with its provenance. Stored records have their identity columns stripped
//! so only technical fields reach the oracle; structured input passes
//! through untouched; free text goes through the extractor.

use cablecheck_common::{DesignFields, InputSource};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db;
use crate::services::input_selector::InputSelection;
use crate::services::text_extractor::{ExtractError, TextExtractor};

/// Identity columns never forwarded to validation
const IDENTITY_FIELDS: [&str; 2] = ["id", "design_id"];

/// Payload normalization errors
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Record-identifier path: no stored design matched
    #[error("Design ID not found: {0}")]
    RecordNotFound(String),

    /// Free-text path: the extractor could not produce a payload
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// Storage failure during record lookup
    #[error(transparent)]
    Storage(#[from] cablecheck_common::Error),
}

/// Canonical payload plus the channel that produced it
#[derive(Debug, Clone)]
pub struct NormalizedPayload {
    pub source: InputSource,
    pub payload: DesignFields,
}

/// Resolves input selections into normalized payloads
pub struct PayloadNormalizer {
    db: SqlitePool,
    extractor: TextExtractor,
}

impl PayloadNormalizer {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            extractor: TextExtractor::new(),
        }
    }

    /// Resolve the selected channel into a tagged canonical payload
    pub async fn normalize(
        &self,
        selection: InputSelection,
    ) -> Result<NormalizedPayload, NormalizeError> {
        match selection {
            InputSelection::Record(design_id) => {
                let record = db::designs::fetch_design(&self.db, &design_id)
                    .await?
                    .ok_or(NormalizeError::RecordNotFound(design_id))?;

                Ok(NormalizedPayload {
                    source: InputSource::Db,
                    payload: strip_identity_fields(record),
                })
            }

            // No validation of names or types here; that judgment belongs to
            // the oracle step
            InputSelection::Structured(fields) => Ok(NormalizedPayload {
                source: InputSource::Structured,
                payload: fields,
            }),

            InputSelection::FreeText(text) => {
                let extracted = self.extractor.extract(&text)?;
                Ok(NormalizedPayload {
                    source: InputSource::Text,
                    payload: extracted,
                })
            }
        }
    }
}

/// Drop identity keys from a stored record, keeping only technical fields
fn strip_identity_fields(mut record: DesignFields) -> DesignFields {
    for key in IDENTITY_FIELDS {
        record.remove(key);
    }
    record
}
