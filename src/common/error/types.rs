//! Unified error types for spreadsheet-core.
//!
//! Every fallible operation in the crate reports one of four kinds, so that
//! callers (for example a REST layer) can map them onto client errors or a
//! fixed "not supported" response without inspecting messages.
use thiserror::Error;

/// Main error type for token, reference and store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required input was missing or empty
    #[error("Missing {0}")]
    NullArgument(String),

    /// Input was present but structurally invalid
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation is not supported by this implementation (read-only stores)
    #[error("Not supported: {0}")]
    UnsupportedOperation(String),

    /// Data reached during extraction or resolution is contradictory
    #[error("Illegal state: {0}")]
    IllegalState(String),
}

impl Error {
    pub(crate) fn null(what: impl Into<String>) -> Self {
        Error::NullArgument(what.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub(crate) fn unsupported(operation: impl Into<String>) -> Self {
        Error::UnsupportedOperation(operation.into())
    }

    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        Error::IllegalState(message.into())
    }
}

/// Result type for spreadsheet-core operations.
pub type Result<T> = std::result::Result<T, Error>;
