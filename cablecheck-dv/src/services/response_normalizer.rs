//! Oracle response shape normalization
//!
//! The oracle's output contract is advisory, not enforced: the reply is a
//! text blob that usually — but not always — contains JSON, possibly wrapped
//! in code fences, with `fields`, `validation` and `confidence` in any of
//! several shapes. This module converts that into the strict internal verdict
//! shape without trusting any of it.
//!
//! A reply that fails to parse as JSON degrades to an empty verdict (empty
//! fields, empty validation, fallback confidence) rather than erroring; an
//! oracle that replied unintelligibly is "cannot validate", not a fault. A
//! reply that parses but carries a `validation` value of an unusable type is
//! a structural violation and does error — see [`ShapeError`].

use cablecheck_common::config::ValidationPolicy;
use cablecheck_common::{DesignFields, FieldStatus};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::services::confidence::normalize_confidence;

/// Comment attached to entries synthesized from a bare "valid" marker
const AUTO_PASS_COMMENT: &str = "Auto-passed (oracle returned valid)";

/// Post-parse structural violation of the minimum oracle contract
#[derive(Debug, Error)]
pub enum ShapeError {
    /// `validation` was present but neither a sequence, a valid-marker, nor null
    #[error("oracle validation entries are not a sequence (got {0})")]
    ValidationNotASequence(&'static str),
}

/// One normalized validation entry from the oracle
#[derive(Debug, Clone, PartialEq)]
pub struct OracleValidationEntry {
    pub field: String,
    pub status: FieldStatus,
    pub expected: Value,
    pub comment: String,
}

/// Canonical shape of an oracle reply after defensive normalization
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub fields: DesignFields,
    pub validation: Vec<OracleValidationEntry>,
    pub confidence: f64,
}

/// Normalize a raw oracle reply into a verdict.
///
/// Never errors on unparseable text; errors only on a post-parse structural
/// violation of the `validation` shape.
pub fn normalize_response(raw: &str, policy: ValidationPolicy) -> Result<OracleVerdict, ShapeError> {
    let parsed = parse_oracle_payload(raw);

    let fields = normalize_fields(parsed.get("fields"));
    let validation = normalize_validation(parsed.get("validation"), &fields, policy)?;
    let confidence = normalize_confidence(parsed.get("confidence"));

    Ok(OracleVerdict {
        fields,
        validation,
        confidence,
    })
}

/// Strip triple-backtick code fencing (optionally language-tagged) and trim
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Lenient parse: a reply that is not valid JSON degrades to an empty object
fn parse_oracle_payload(raw: &str) -> Value {
    let stripped = strip_code_fences(raw);

    match serde_json::from_str(&stripped) {
        Ok(value) => value,
        Err(e) => {
            warn!("Oracle reply was not valid JSON, treating as empty: {}", e);
            Value::Object(DesignFields::new())
        }
    }
}

/// Fold the raw `fields` value into a field-name → expected-value mapping.
///
/// A sequence of `{field, expected}` pairs is folded; a mapping is used
/// as-is; anything else yields an empty mapping, never an error.
fn normalize_fields(raw: Option<&Value>) -> DesignFields {
    match raw {
        Some(Value::Array(pairs)) => {
            let mut fields = DesignFields::new();
            for pair in pairs {
                if let Some(name) = pair.get("field").and_then(Value::as_str) {
                    let expected = pair.get("expected").cloned().unwrap_or(Value::Null);
                    fields.insert(name.to_string(), expected);
                }
            }
            fields
        }
        Some(Value::Object(map)) => map.clone(),
        _ => DesignFields::new(),
    }
}

/// Normalize the raw `validation` value into a list of entries.
///
/// Sequence entries are decoded defensively (missing status defaults per
/// policy, missing expected falls back to the field mapping, missing comment
/// becomes empty). A bare `true` or `"valid"` marker synthesizes one PASS
/// entry per known field. Absent or null yields an empty list. Any other
/// present shape violates the minimum contract.
fn normalize_validation(
    raw: Option<&Value>,
    fields: &DesignFields,
    policy: ValidationPolicy,
) -> Result<Vec<OracleValidationEntry>, ShapeError> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),

        Some(Value::Array(entries)) => {
            let mut normalized = Vec::with_capacity(entries.len());
            for entry in entries {
                let Some(field) = entry.get("field").and_then(Value::as_str) else {
                    warn!("Dropping oracle validation entry without a field name");
                    continue;
                };

                let status = entry
                    .get("status")
                    .and_then(Value::as_str)
                    .and_then(decode_status)
                    .unwrap_or_else(|| default_status(policy));

                let expected = entry
                    .get("expected")
                    .cloned()
                    .or_else(|| fields.get(field).cloned())
                    .unwrap_or(Value::Null);

                let comment = entry
                    .get("comment")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();

                normalized.push(OracleValidationEntry {
                    field: field.to_string(),
                    status,
                    expected,
                    comment,
                });
            }
            Ok(normalized)
        }

        // Bare "everything checks out" marker: auto-pass every known field
        Some(marker) if is_valid_marker(marker) => {
            Ok(fields
                .iter()
                .map(|(name, expected)| OracleValidationEntry {
                    field: name.clone(),
                    status: FieldStatus::Pass,
                    expected: expected.clone(),
                    comment: AUTO_PASS_COMMENT.to_string(),
                })
                .collect())
        }

        Some(other) => Err(ShapeError::ValidationNotASequence(value_type_name(other))),
    }
}

fn is_valid_marker(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || value.as_str() == Some("valid")
}

fn decode_status(raw: &str) -> Option<FieldStatus> {
    match raw.to_uppercase().as_str() {
        "PASS" => Some(FieldStatus::Pass),
        "FAIL" => Some(FieldStatus::Fail),
        "WARN" => Some(FieldStatus::Warn),
        _ => None,
    }
}

/// Missing-status default: unverified implies failed under the strict policy
fn default_status(policy: ValidationPolicy) -> FieldStatus {
    match policy {
        ValidationPolicy::Strict => FieldStatus::Fail,
        ValidationPolicy::Permissive => FieldStatus::Pass,
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::confidence::FALLBACK_CONFIDENCE;
    use serde_json::json;

    fn normalize_strict(raw: &str) -> OracleVerdict {
        normalize_response(raw, ValidationPolicy::Strict).unwrap()
    }

    #[test]
    fn test_fields_sequence_folded_into_mapping() {
        let raw = json!({
            "fields": [
                {"field": "standard", "expected": "IEC 60502-1"},
                {"field": "csa", "expected": 10},
            ],
            "validation": [],
        })
        .to_string();

        let verdict = normalize_strict(&raw);
        assert_eq!(verdict.fields["standard"], json!("IEC 60502-1"));
        assert_eq!(verdict.fields["csa"], json!(10));
    }

    #[test]
    fn test_fields_mapping_used_as_is() {
        let raw = json!({"fields": {"csa": 10}, "validation": []}).to_string();
        let verdict = normalize_strict(&raw);
        assert_eq!(verdict.fields["csa"], json!(10));
    }

    #[test]
    fn test_fields_wrong_shape_yields_empty_mapping() {
        for fields in [json!("csa"), json!(42), json!(null)] {
            let raw = json!({"fields": fields, "validation": []}).to_string();
            let verdict = normalize_strict(&raw);
            assert!(verdict.fields.is_empty());
        }
    }

    #[test]
    fn test_valid_marker_auto_passes_known_fields() {
        // Field pairs + bare marker + qualitative confidence, all at once
        let raw = json!({
            "fields": [{"field": "x", "expected": 5}],
            "validation": true,
            "confidence": "low",
        })
        .to_string();

        let verdict = normalize_strict(&raw);
        assert_eq!(verdict.fields, json!({"x": 5}).as_object().unwrap().clone());
        assert_eq!(verdict.validation.len(), 1);
        assert_eq!(verdict.validation[0].field, "x");
        assert_eq!(verdict.validation[0].status, FieldStatus::Pass);
        assert_eq!(verdict.validation[0].expected, json!(5));
        assert_eq!(verdict.validation[0].comment, AUTO_PASS_COMMENT);
        assert_eq!(verdict.confidence, 0.3);
    }

    #[test]
    fn test_valid_string_marker_behaves_like_true() {
        let raw = json!({"fields": {"csa": 10}, "validation": "valid"}).to_string();
        let verdict = normalize_strict(&raw);
        assert_eq!(verdict.validation.len(), 1);
        assert_eq!(verdict.validation[0].status, FieldStatus::Pass);
    }

    #[test]
    fn test_unparseable_reply_degrades_to_empty_verdict() {
        let verdict = normalize_strict("the oracle had a bad day");
        assert!(verdict.fields.is_empty());
        assert!(verdict.validation.is_empty());
        assert_eq!(verdict.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_code_fences_stripped_before_parsing() {
        let raw = "```json\n{\"fields\": {\"csa\": 10}, \"validation\": [], \"confidence\": 90}\n```";
        let verdict = normalize_strict(raw);
        assert_eq!(verdict.fields["csa"], json!(10));
        assert_eq!(verdict.confidence, 0.9);
    }

    #[test]
    fn test_entry_defaults_applied() {
        let raw = json!({
            "fields": {"csa": 10},
            "validation": [{"field": "csa"}],
        })
        .to_string();

        let verdict = normalize_strict(&raw);
        let entry = &verdict.validation[0];
        // Missing status defaults to FAIL under the strict policy
        assert_eq!(entry.status, FieldStatus::Fail);
        // Missing expected falls back to the field mapping
        assert_eq!(entry.expected, json!(10));
        assert_eq!(entry.comment, "");
    }

    #[test]
    fn test_permissive_policy_defaults_missing_status_to_pass() {
        let raw = json!({
            "fields": {"csa": 10},
            "validation": [{"field": "csa"}],
        })
        .to_string();

        let verdict = normalize_response(&raw, ValidationPolicy::Permissive).unwrap();
        assert_eq!(verdict.validation[0].status, FieldStatus::Pass);
    }

    #[test]
    fn test_entry_without_field_name_dropped() {
        let raw = json!({
            "fields": {},
            "validation": [{"status": "PASS"}, {"field": "csa", "status": "PASS"}],
        })
        .to_string();

        let verdict = normalize_strict(&raw);
        assert_eq!(verdict.validation.len(), 1);
        assert_eq!(verdict.validation[0].field, "csa");
    }

    #[test]
    fn test_absent_or_null_validation_yields_empty_list() {
        for raw in [
            json!({"fields": {"csa": 10}}).to_string(),
            json!({"fields": {"csa": 10}, "validation": null}).to_string(),
        ] {
            let verdict = normalize_strict(&raw);
            assert!(verdict.validation.is_empty());
        }
    }

    #[test]
    fn test_non_sequence_validation_is_a_shape_error() {
        for validation in [json!(42), json!({"csa": "PASS"}), json!(false), json!("nope")] {
            let raw = json!({"fields": {}, "validation": validation}).to_string();
            let result = normalize_response(&raw, ValidationPolicy::Strict);
            assert!(
                result.is_err(),
                "validation shape {} should be rejected",
                validation
            );
        }
    }
}
