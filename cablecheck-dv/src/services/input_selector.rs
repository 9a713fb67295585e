//! Input channel selection
//!
//! Pure precondition check on the request body: exactly one of the three
//! input channels must carry data. Runs before any other component touches
//! the request.

use cablecheck_common::DesignFields;
use thiserror::Error;

use crate::models::ValidateDesignRequest;

/// Input selection errors
#[derive(Debug, Error)]
pub enum SelectError {
    /// Zero or more than one channel populated
    #[error("exactly one input type must be provided")]
    MultipleOrNoInput,
}

/// The single populated input channel of a request
#[derive(Debug, Clone, PartialEq)]
pub enum InputSelection {
    /// Stored record identifier
    Record(String),
    /// Structured field set, taken verbatim
    Structured(DesignFields),
    /// Free-text description
    FreeText(String),
}

/// Validate that exactly one channel was supplied and return it.
///
/// Empty values count as absent: a blank or whitespace-only string and an
/// empty object are treated the same as an omitted key.
pub fn select_input(request: &ValidateDesignRequest) -> Result<InputSelection, SelectError> {
    let record = request
        .design_id
        .as_deref()
        .filter(|id| !id.trim().is_empty());
    let structured = request
        .structured_input
        .as_ref()
        .filter(|fields| !fields.is_empty());
    let text = request
        .free_text
        .as_deref()
        .filter(|text| !text.trim().is_empty());

    match (record, structured, text) {
        (Some(id), None, None) => Ok(InputSelection::Record(id.to_string())),
        (None, Some(fields), None) => Ok(InputSelection::Structured(fields.clone())),
        (None, None, Some(text)) => Ok(InputSelection::FreeText(text.to_string())),
        _ => Err(SelectError::MultipleOrNoInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured_fields() -> DesignFields {
        json!({"standard": "IEC 60502-1"}).as_object().unwrap().clone()
    }

    #[test]
    fn test_single_channel_selected() {
        let request = ValidateDesignRequest {
            design_id: Some("CD-001".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_input(&request).unwrap(),
            InputSelection::Record("CD-001".to_string())
        );

        let request = ValidateDesignRequest {
            structured_input: Some(structured_fields()),
            ..Default::default()
        };
        assert_eq!(
            select_input(&request).unwrap(),
            InputSelection::Structured(structured_fields())
        );

        let request = ValidateDesignRequest {
            free_text: Some("iec cable".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_input(&request).unwrap(),
            InputSelection::FreeText("iec cable".to_string())
        );
    }

    #[test]
    fn test_no_channel_rejected() {
        let request = ValidateDesignRequest::default();
        assert!(select_input(&request).is_err());
    }

    #[test]
    fn test_multiple_channels_rejected() {
        let request = ValidateDesignRequest {
            design_id: Some("CD-001".to_string()),
            free_text: Some("iec cable".to_string()),
            ..Default::default()
        };
        assert!(select_input(&request).is_err());

        let request = ValidateDesignRequest {
            design_id: Some("CD-001".to_string()),
            structured_input: Some(structured_fields()),
            free_text: Some("iec cable".to_string()),
        };
        assert!(select_input(&request).is_err());
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        // Blank string next to a real channel: still exactly one input
        let request = ValidateDesignRequest {
            design_id: Some("   ".to_string()),
            free_text: Some("iec cable".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_input(&request).unwrap(),
            InputSelection::FreeText("iec cable".to_string())
        );

        // Empty object alone: no input at all
        let request = ValidateDesignRequest {
            structured_input: Some(DesignFields::new()),
            ..Default::default()
        };
        assert!(select_input(&request).is_err());
    }
}
