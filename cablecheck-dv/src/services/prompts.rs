//! Oracle instruction text
//!
//! Only the contract matters to the pipeline (field set in, JSON-shaped text
//! out); the wording here is the collaborator side of that contract. Two
//! variants exist because the two observed extraction philosophies disagree:
//! the strict one refuses to infer anything, the permissive one is allowed
//! to fill gaps. The deployment policy selects which is sent.

use cablecheck_common::config::ValidationPolicy;
use cablecheck_common::DesignFields;

/// System message framing every oracle call
pub const SYSTEM_PROMPT: &str = "You are a strict JSON-only validator.";

/// Build the per-request instruction text for the given field set
pub fn build_validation_prompt(fields: &DesignFields, policy: ValidationPolicy) -> String {
    let input_json =
        serde_json::to_string_pretty(fields).unwrap_or_else(|_| "{}".to_string());

    match policy {
        ValidationPolicy::Strict => strict_prompt(&input_json),
        ValidationPolicy::Permissive => permissive_prompt(&input_json),
    }
}

fn strict_prompt(input_json: &str) -> String {
    format!(
        r#"You are an expert in IEC 60502-1 cable specifications.

INPUT:
{input_json}

TASK:
1. Validate each given attribute strictly against IEC 60502-1.
2. Judge ONLY the attributes that are present in the input.
3. DO NOT guess or assume values for absent attributes.
4. If fewer than TWO attributes can be confidently judged, return an empty
   result with confidence 0.

Respond ONLY with valid JSON, no text outside it, in this exact format:
{{
  "fields": {{ ... }},
  "validation": [
    {{
      "field": "string",
      "status": "PASS | FAIL | WARN",
      "expected": "string",
      "comment": "string"
    }}
  ],
  "confidence": {{
    "overall": number
  }}
}}

IMPORTANT:
- Never hallucinate values.
- Never fill missing fields just to complete the structure.
"#
    )
}

fn permissive_prompt(input_json: &str) -> String {
    format!(
        r#"You are an IEC cable design validation expert.

INPUT:
{input_json}

TASK:
- Validate the given cable design against IEC 60502-1.
- Where an attribute is missing you may infer a plausible value from the
  attributes that are present; mark inferred entries with status WARN and
  say so in the comment.
- Respond ONLY with valid JSON. Do NOT add text outside JSON.

Return JSON in this exact format:
{{
  "fields": {{ ... }},
  "validation": [
    {{
      "field": "string",
      "status": "PASS | FAIL | WARN",
      "expected": "string",
      "comment": "string"
    }}
  ],
  "confidence": {{
    "overall": number
  }}
}}
"#
    )
}
