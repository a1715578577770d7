//! Single-cell references in A1 notation.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Largest addressable column (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// Largest addressable row.
pub const MAX_ROW: u32 = 1_048_576;

/// Whether one axis of a reference is anchored (`$A`) or relative (`A`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ReferenceKind {
    #[default]
    Relative,
    Absolute,
}

impl ReferenceKind {
    #[inline]
    fn prefix(self) -> Option<char> {
        match self {
            ReferenceKind::Relative => None,
            ReferenceKind::Absolute => Some('$'),
        }
    }
}

/// A reference to one cell.
///
/// Row and column are 1-based. The derived ordering is row-major, which is
/// what the store indices rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellReference {
    row: u32,
    column: u32,
    row_kind: ReferenceKind,
    column_kind: ReferenceKind,
}

impl CellReference {
    /// Create a relative reference, e.g. `CellReference::new(2, 3)` is `B3`.
    pub fn new(column: u32, row: u32) -> Result<Self> {
        Self::with_kinds(column, ReferenceKind::Relative, row, ReferenceKind::Relative)
    }

    /// Create a reference with explicit per-axis kinds.
    pub fn with_kinds(
        column: u32,
        column_kind: ReferenceKind,
        row: u32,
        row_kind: ReferenceKind,
    ) -> Result<Self> {
        if column == 0 || column > MAX_COLUMN {
            return Err(Error::invalid(format!(
                "column {} outside 1..={}",
                column, MAX_COLUMN
            )));
        }
        if row == 0 || row > MAX_ROW {
            return Err(Error::invalid(format!("row {} outside 1..={}", row, MAX_ROW)));
        }
        Ok(Self {
            row,
            column,
            row_kind,
            column_kind,
        })
    }

    /// 1-based column.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// 1-based row.
    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub fn column_kind(&self) -> ReferenceKind {
        self.column_kind
    }

    #[inline]
    pub fn row_kind(&self) -> ReferenceKind {
        self.row_kind
    }

    /// Same coordinates with both axes relative. Store indices key on this.
    pub fn to_relative(self) -> Self {
        Self {
            row_kind: ReferenceKind::Relative,
            column_kind: ReferenceKind::Relative,
            ..self
        }
    }

    /// Same coordinates with both axes absolute (`$A$1`).
    pub fn to_absolute(self) -> Self {
        Self {
            row_kind: ReferenceKind::Absolute,
            column_kind: ReferenceKind::Absolute,
            ..self
        }
    }

    /// True when both references address the same cell, ignoring kinds.
    #[inline]
    pub fn same_cell(&self, other: &CellReference) -> bool {
        self.row == other.row && self.column == other.column
    }

    /// Column letters, e.g. `AB` for column 28.
    pub fn column_label(&self) -> String {
        column_index_to_letters(self.column)
    }
}

/// Convert a 1-based column index into its letters (`1` → `A`, `27` → `AA`).
pub(crate) fn column_index_to_letters(mut column: u32) -> String {
    let mut buf = [0u8; 8];
    let mut len = 0;
    while column > 0 {
        let rem = (column - 1) % 26;
        buf[len] = b'A' + rem as u8;
        len += 1;
        column = (column - 1) / 26;
    }
    buf[..len].reverse();
    buf[..len].iter().map(|&b| b as char).collect()
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.column_kind.prefix() {
            f.write_char(prefix)?;
        }
        f.write_str(&self.column_label())?;
        if let Some(prefix) = self.row_kind.prefix() {
            f.write_char(prefix)?;
        }
        let mut buffer = itoa::Buffer::new();
        f.write_str(buffer.format(self.row))
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_cell_reference(s)
    }
}

impl TryFrom<String> for CellReference {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CellReference> for String {
    fn from(value: CellReference) -> Self {
        value.to_string()
    }
}
