//! Error types for the VCR core
//!
//! Normalization itself never fails: unparseable URIs pass through and absent
//! headers become an empty mapping. The variants here cover the few places
//! where an adapter hands over data that cannot be coerced at all.

use thiserror::Error;

/// VCR core error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Status line code field is not an integer
    #[error("Invalid status code: {0:?}")]
    InvalidStatusCode(String),

    /// Match attribute name not recognized
    #[error("Unknown match attribute: {0:?}")]
    UnknownMatchAttribute(String),

    /// Canonical value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type alias for VCR operations
pub type Result<T> = std::result::Result<T, Error>;
