//! Request and report types for the design validation API

pub mod report;
pub mod request;

pub use report::{FieldResult, ValidationReport};
pub use request::ValidateDesignRequest;
