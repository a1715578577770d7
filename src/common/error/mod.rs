//! Unified error types for spreadsheet-core.
//!
//! This module provides the single error type shared by tokens, parsers,
//! reference stores and converters.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
