//! Shared error type for CableCheck services
//!
//! Covers the infrastructure concerns every service touches: storage, the
//! filesystem, and configuration. Pipeline-specific failures (input
//! selection, extraction, oracle trouble) live with their components in the
//! service crates and are mapped to HTTP at the API boundary.

use thiserror::Error;

/// Common result type for CableCheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure errors shared across CableCheck services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem operation failed (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration missing, unreadable, or unparseable
    #[error("Configuration error: {0}")]
    Config(String),
}
