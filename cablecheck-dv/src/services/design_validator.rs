//! Validation orchestrator
//!
//! Drives the pipeline in strict sequence: input selection → payload
//! normalization → oracle call → response shape normalization → report
//! assembly. Stages share nothing and each stage's failure propagates
//! unchanged; a failing request yields no report.

use cablecheck_common::config::ValidationPolicy;
use cablecheck_common::{FieldStatus, InputSource, OverallStatus};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::{FieldResult, ValidateDesignRequest, ValidationReport};
use crate::services::input_selector::{select_input, SelectError};
use crate::services::oracle_client::{OracleApi, OracleError};
use crate::services::payload_normalizer::{NormalizeError, PayloadNormalizer};
use crate::services::prompts::build_validation_prompt;
use crate::services::response_normalizer::{normalize_response, OracleVerdict, ShapeError};

/// Pipeline errors, in stage order
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Transport or auth failure talking to the oracle (retryable)
    #[error("Oracle unavailable: {0}")]
    Oracle(#[from] OracleError),

    /// Oracle replied but the post-parse structure violates the minimum
    /// contract (fatal, non-retryable)
    #[error("Malformed oracle response: {0}")]
    MalformedOracleResponse(#[from] ShapeError),
}

/// Top-level validation pipeline
pub struct DesignValidator {
    normalizer: PayloadNormalizer,
    oracle: Arc<dyn OracleApi>,
    policy: ValidationPolicy,
}

impl DesignValidator {
    pub fn new(db: SqlitePool, oracle: Arc<dyn OracleApi>, policy: ValidationPolicy) -> Self {
        Self {
            normalizer: PayloadNormalizer::new(db),
            oracle,
            policy,
        }
    }

    /// Run one validation request end to end
    pub async fn validate(
        &self,
        request: &ValidateDesignRequest,
    ) -> Result<ValidationReport, ValidateError> {
        let selection = select_input(request)?;
        let normalized = self.normalizer.normalize(selection).await?;
        debug!(source = normalized.source.as_str(), "Payload normalized");

        let prompt = build_validation_prompt(&normalized.payload, self.policy);
        let raw_reply = self.oracle.complete(&prompt).await?;

        let verdict = normalize_response(&raw_reply, self.policy)?;
        debug!(
            entries = verdict.validation.len(),
            confidence = verdict.confidence,
            "Oracle verdict normalized"
        );

        Ok(assemble_report(normalized.source, verdict))
    }
}

/// Join validation entries with the values the oracle saw and roll up the
/// overall status (PASS iff every entry passed; an empty entry list is
/// vacuously PASS)
fn assemble_report(source: InputSource, verdict: OracleVerdict) -> ValidationReport {
    let results: Vec<FieldResult> = verdict
        .validation
        .iter()
        .map(|entry| FieldResult {
            field: entry.field.clone(),
            provided: verdict.fields.get(&entry.field).cloned().unwrap_or(Value::Null),
            expected: entry.expected.clone(),
            status: entry.status,
            comment: entry.comment.clone(),
        })
        .collect();

    let overall_status = if results.iter().all(|r| r.status == FieldStatus::Pass) {
        OverallStatus::Pass
    } else {
        OverallStatus::Fail
    };

    ValidationReport {
        input_source: source,
        fields: verdict.fields,
        results,
        overall_status,
        confidence: verdict.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::response_normalizer::OracleValidationEntry;
    use async_trait::async_trait;
    use cablecheck_common::DesignFields;
    use serde_json::json;

    /// Oracle stub returning a canned reply (or a canned failure)
    struct StubOracle {
        reply: Result<String, ()>,
    }

    impl StubOracle {
        fn replying(raw: &str) -> Arc<dyn OracleApi> {
            Arc::new(Self {
                reply: Ok(raw.to_string()),
            })
        }

        fn unreachable() -> Arc<dyn OracleApi> {
            Arc::new(Self { reply: Err(()) })
        }
    }

    #[async_trait]
    impl OracleApi for StubOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            match &self.reply {
                Ok(raw) => Ok(raw.clone()),
                Err(()) => Err(OracleError::NetworkError("connection refused".to_string())),
            }
        }
    }

    async fn validator_with(oracle: Arc<dyn OracleApi>) -> DesignValidator {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        crate::db::init_schema(&pool).await.unwrap();
        DesignValidator::new(pool, oracle, ValidationPolicy::Strict)
    }

    fn entry(field: &str, status: FieldStatus) -> OracleValidationEntry {
        OracleValidationEntry {
            field: field.to_string(),
            status,
            expected: json!("x"),
            comment: String::new(),
        }
    }

    #[test]
    fn test_all_pass_rolls_up_to_pass() {
        let verdict = OracleVerdict {
            fields: DesignFields::new(),
            validation: vec![entry("a", FieldStatus::Pass), entry("b", FieldStatus::Pass)],
            confidence: 0.9,
        };

        let report = assemble_report(InputSource::Structured, verdict);
        assert_eq!(report.overall_status, OverallStatus::Pass);
    }

    #[test]
    fn test_warn_fails_the_roll_up() {
        let verdict = OracleVerdict {
            fields: DesignFields::new(),
            validation: vec![entry("a", FieldStatus::Pass), entry("b", FieldStatus::Warn)],
            confidence: 0.9,
        };

        let report = assemble_report(InputSource::Structured, verdict);
        assert_eq!(report.overall_status, OverallStatus::Fail);
    }

    #[test]
    fn test_results_joined_with_provided_values() {
        let mut fields = DesignFields::new();
        fields.insert("csa".to_string(), json!(10));

        let verdict = OracleVerdict {
            fields,
            validation: vec![entry("csa", FieldStatus::Pass), entry("voltage", FieldStatus::Fail)],
            confidence: 0.9,
        };

        let report = assemble_report(InputSource::Db, verdict);
        assert_eq!(report.input_source, InputSource::Db);
        assert_eq!(report.results[0].provided, json!(10));
        // The oracle judged a field it was never given
        assert_eq!(report.results[1].provided, Value::Null);
    }

    #[tokio::test]
    async fn test_pipeline_end_to_end_with_stub_oracle() {
        let reply = json!({
            "fields": {"standard": "IEC 60502-1", "insulation_material": "PVC"},
            "validation": [
                {"field": "standard", "status": "PASS", "expected": "IEC 60502-1", "comment": "ok"},
                {"field": "insulation_material", "status": "PASS", "expected": "PVC", "comment": "ok"},
            ],
            "confidence": {"overall": 80},
        })
        .to_string();

        let validator = validator_with(StubOracle::replying(&reply)).await;
        let request = ValidateDesignRequest {
            free_text: Some("iec cable, pvc insulation".to_string()),
            ..Default::default()
        };

        let report = validator.validate(&request).await.unwrap();
        assert_eq!(report.input_source, InputSource::Text);
        assert_eq!(report.overall_status, OverallStatus::Pass);
        assert_eq!(report.confidence, 0.8);
        assert_eq!(report.results.len(), 2);
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let validator = validator_with(StubOracle::unreachable()).await;
        let request = ValidateDesignRequest {
            free_text: Some("iec cable".to_string()),
            ..Default::default()
        };

        let result = validator.validate(&request).await;
        assert!(matches!(result, Err(ValidateError::Oracle(_))));
    }

    #[tokio::test]
    async fn test_malformed_validation_shape_is_fatal() {
        let reply = json!({"fields": {}, "validation": 42}).to_string();
        let validator = validator_with(StubOracle::replying(&reply)).await;
        let request = ValidateDesignRequest {
            free_text: Some("iec cable".to_string()),
            ..Default::default()
        };

        let result = validator.validate(&request).await;
        assert!(matches!(result, Err(ValidateError::MalformedOracleResponse(_))));
    }

    #[tokio::test]
    async fn test_selector_runs_before_everything_else() {
        // Even with an unreachable oracle, a bad request fails on selection
        let validator = validator_with(StubOracle::unreachable()).await;
        let request = ValidateDesignRequest::default();

        let result = validator.validate(&request).await;
        assert!(matches!(result, Err(ValidateError::Select(_))));
    }
}
