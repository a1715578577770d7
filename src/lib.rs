//! Spreadsheet core - token trees, reference resolution and value conversion
//!
//! This library holds the parts of a spreadsheet engine that sit between raw
//! text and evaluation:
//!
//! # Features
//!
//! - **Token trees**: immutable, text-preserving parse trees for formulas and
//!   format patterns, traversed through a double-dispatch visitor
//! - **Parsers**: A1 references, date/time text read against a pattern, and
//!   text format patterns
//! - **Label store**: named cells and ranges with reverse lookup from a cell
//!   to every label covering it, safe to share between threads
//! - **Conversion**: composable converters for displaying cell values
//!
//! # Example - Reading a date
//!
//! ```
//! use spreadsheet_core::parser::parse_date_time;
//! use spreadsheet_core::token::date_time::to_local_date_time;
//!
//! # fn main() -> spreadsheet_core::Result<()> {
//! let tree = parse_date_time("1999/12/31 12:58:59", "yyyy/mm/dd hh:mm:ss")?;
//! assert_eq!(to_local_date_time(&tree)?.to_string(), "1999-12-31 12:58:59");
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Resolving labels
//!
//! ```
//! use spreadsheet_core::reference::{CellReference, LabelMapping, LabelName};
//! use spreadsheet_core::store::{LabelStore, MemoryLabelStore};
//!
//! # fn main() -> spreadsheet_core::Result<()> {
//! let store = MemoryLabelStore::new();
//! let rate = LabelName::new("TaxRate")?;
//! store.save(LabelMapping::new(rate.clone(), "$B$1".parse::<CellReference>()?)?)?;
//!
//! let found = store.labels(&"B1".parse::<CellReference>()?);
//! assert!(found.contains(&rate));
//! # Ok(())
//! # }
//! ```

/// Shared error type
pub mod common;

/// Cell value converters and pipelines
pub mod convert;

/// Text parsers producing references and token trees
pub mod parser;

/// Cell references, ranges and label names
pub mod reference;

/// Label stores and range-keyed storage
pub mod store;

/// Token trees and the visitor protocol
pub mod token;

pub use common::{Error, Result};
