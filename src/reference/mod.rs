//! Concrete and symbolic spreadsheet references.
//!
//! A [`CellReference`] addresses one cell in A1 terms, a [`CellRange`] a
//! rectangle of cells, and a [`LabelName`] is a user-defined symbol that a
//! [`LabelMapping`] binds to one of them (or to another label).

mod cell;
mod label;
mod range;

pub use cell::{CellReference, MAX_COLUMN, MAX_ROW, ReferenceKind};
pub use label::{LabelMapping, LabelName, LabelTarget, MAX_LABEL_LENGTH};
pub use range::{CellRange, CellReferenceOrRange};
