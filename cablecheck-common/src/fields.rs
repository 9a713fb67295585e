//! Canonical design-field vocabulary
//!
//! A design field set is an open mapping from attribute name to scalar value
//! (string, number, or null). No field is mandatory; which keys are present
//! depends entirely on the input source that produced the set.

use serde::{Deserialize, Serialize};

/// Canonical field set: attribute name → scalar value.
///
/// Known attribute names include `standard`, `voltage`, `conductor_material`,
/// `conductor_class`, `csa`, `insulation_material` and `insulation_thickness`,
/// but the mapping is open — the oracle and the text extractor may introduce
/// further attributes.
pub type DesignFields = serde_json::Map<String, serde_json::Value>;

/// Per-field validation status as reported by the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldStatus {
    Pass,
    Fail,
    /// Informative only; a WARN entry still fails the report roll-up
    Warn,
}

impl FieldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStatus::Pass => "PASS",
            FieldStatus::Fail => "FAIL",
            FieldStatus::Warn => "WARN",
        }
    }
}

/// Aggregate report status: PASS only when every entry passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Pass,
    Fail,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Pass => "PASS",
            OverallStatus::Fail => "FAIL",
        }
    }
}

/// Which input channel produced a normalized payload.
///
/// Carried through to the final report for auditability; never consulted by
/// the validation logic itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputSource {
    Db,
    Structured,
    Text,
}

impl InputSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputSource::Db => "DB",
            InputSource::Structured => "STRUCTURED",
            InputSource::Text => "TEXT",
        }
    }
}
