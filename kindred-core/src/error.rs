//! Error types for the companion memory core.
//!
//! The engine itself has no fatal errors — degenerate inputs degrade to
//! no-ops. Errors exist only at the configuration and serialization
//! boundary.

use thiserror::Error;

/// Top-level error type for all kindred operations.
#[derive(Error, Debug)]
pub enum KindredError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, KindredError>;
