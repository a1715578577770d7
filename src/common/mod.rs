//! Common types shared across tokens, parsers, stores and converters.

// Submodule declarations
pub mod error;

// Re-exports for convenience
pub use error::{Error, Result};
