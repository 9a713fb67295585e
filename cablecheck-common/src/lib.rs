//! # CableCheck Common Library
//!
//! Shared code for CableCheck services including:
//! - Common error type
//! - Configuration loading and root folder resolution
//! - Canonical design-field vocabulary (field sets, statuses, provenance)

pub mod config;
pub mod error;
pub mod fields;

pub use error::{Error, Result};
pub use fields::{DesignFields, FieldStatus, InputSource, OverallStatus};
