//! Confidence score normalization
//!
//! The oracle reports confidence in whatever shape it feels like: a 0–100
//! percentage, a 0–1 fraction, a qualitative label, or an object with an
//! `overall` number. This module folds all of them onto one 0–1 scale.

use serde_json::Value;

/// Confidence used when the oracle reported nothing usable.
///
/// A reported confidence of exactly 0 is conflated with "no information" and
/// also receives this value; revisit here if genuine zero confidence ever
/// needs to survive normalization.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Normalize an arbitrary confidence representation to a 0–1 float.
///
/// Total over all JSON-representable inputs; there is no error path.
pub fn normalize_confidence(raw: Option<&Value>) -> f64 {
    let mut confidence = 0.0;

    if let Some(value) = raw {
        if let Some(number) = value.as_f64() {
            confidence = scale_number(number);
        } else if let Some(overall) = value.get("overall").and_then(Value::as_f64) {
            confidence = scale_number(overall);
        } else if let Some(label) = value.as_str() {
            confidence = match label.to_lowercase().as_str() {
                "high" => 0.9,
                "medium" => 0.6,
                "low" => 0.3,
                // Unknown labels fall through to the fallback
                _ => 0.0,
            };
        }
    }

    if confidence == 0.0 {
        FALLBACK_CONFIDENCE
    } else {
        confidence
    }
}

/// A number above 1 is read as a 0–100 percentage; otherwise it is already a
/// fraction.
fn scale_number(number: f64) -> f64 {
    if number > 1.0 {
        number / 100.0
    } else {
        number
    }
}
