//! Service modules for the design validation pipeline
//!
//! Leaf-first: confidence and response-shape normalization are pure; the
//! extractor is deterministic; the payload normalizer touches storage; the
//! oracle client talks to the outside world; the design validator drives
//! them all in sequence.

pub mod confidence;
pub mod design_validator;
pub mod input_selector;
pub mod oracle_client;
pub mod payload_normalizer;
pub mod prompts;
pub mod response_normalizer;
pub mod text_extractor;

pub use confidence::{normalize_confidence, FALLBACK_CONFIDENCE};
pub use design_validator::{DesignValidator, ValidateError};
pub use input_selector::{select_input, InputSelection, SelectError};
pub use oracle_client::{OracleApi, OracleClient, OracleError};
pub use payload_normalizer::{NormalizeError, NormalizedPayload, PayloadNormalizer};
pub use response_normalizer::{normalize_response, OracleVerdict, ShapeError};
pub use text_extractor::{ExtractError, TextExtractor};
