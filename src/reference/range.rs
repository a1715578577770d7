//! Rectangular cell ranges.

use super::cell::{CellReference, ReferenceKind};
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rectangular block of cells, always normalised so that `begin` is the
/// top-left corner and `end` the bottom-right corner.
///
/// The per-axis reference kinds travel with their coordinate when corners
/// are swapped during normalisation, so `B$2:$A1` becomes `$A1:B$2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRange {
    begin: CellReference,
    end: CellReference,
}

impl CellRange {
    /// Create a range spanning both corners, in any order.
    pub fn new(a: CellReference, b: CellReference) -> Result<Self> {
        let (top, top_kind, bottom, bottom_kind) = if a.row() <= b.row() {
            (a.row(), a.row_kind(), b.row(), b.row_kind())
        } else {
            (b.row(), b.row_kind(), a.row(), a.row_kind())
        };
        let (left, left_kind, right, right_kind) = if a.column() <= b.column() {
            (a.column(), a.column_kind(), b.column(), b.column_kind())
        } else {
            (b.column(), b.column_kind(), a.column(), a.column_kind())
        };

        Ok(Self {
            begin: CellReference::with_kinds(left, left_kind, top, top_kind)?,
            end: CellReference::with_kinds(right, right_kind, bottom, bottom_kind)?,
        })
    }

    /// A range covering exactly one cell.
    pub fn cell(cell: CellReference) -> Self {
        Self {
            begin: cell,
            end: cell,
        }
    }

    /// Top-left corner.
    #[inline]
    pub fn begin(&self) -> CellReference {
        self.begin
    }

    /// Bottom-right corner.
    #[inline]
    pub fn end(&self) -> CellReference {
        self.end
    }

    #[inline]
    pub fn top(&self) -> u32 {
        self.begin.row()
    }

    #[inline]
    pub fn bottom(&self) -> u32 {
        self.end.row()
    }

    #[inline]
    pub fn left(&self) -> u32 {
        self.begin.column()
    }

    #[inline]
    pub fn right(&self) -> u32 {
        self.end.column()
    }

    /// Number of columns covered.
    #[inline]
    pub fn width(&self) -> u32 {
        self.right() - self.left() + 1
    }

    /// Number of rows covered.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom() - self.top() + 1
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn is_single_cell(&self) -> bool {
        self.begin.same_cell(&self.end)
    }

    /// True if the cell lies inside this range. Reference kinds are ignored.
    pub fn contains(&self, cell: &CellReference) -> bool {
        (self.top()..=self.bottom()).contains(&cell.row())
            && (self.left()..=self.right()).contains(&cell.column())
    }

    /// True if `other` lies completely inside this range.
    pub fn contains_range(&self, other: &CellRange) -> bool {
        self.contains(&other.begin) && self.contains(&other.end)
    }

    /// True if the two ranges share at least one cell.
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Same range with every axis relative.
    pub fn to_relative(self) -> Self {
        Self {
            begin: self.begin.to_relative(),
            end: self.end.to_relative(),
        }
    }

    /// True if any axis of either corner is absolute.
    pub fn has_absolute(&self) -> bool {
        [self.begin, self.end].iter().any(|c| {
            c.row_kind() == ReferenceKind::Absolute || c.column_kind() == ReferenceKind::Absolute
        })
    }
}

impl From<CellReference> for CellRange {
    fn from(cell: CellReference) -> Self {
        CellRange::cell(cell)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_cell_range(s)
    }
}

impl TryFrom<String> for CellRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CellRange> for String {
    fn from(value: CellRange) -> Self {
        value.to_string()
    }
}

/// The concrete target a label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellReferenceOrRange {
    Cell(CellReference),
    Range(CellRange),
}

impl CellReferenceOrRange {
    /// The covered cells as a range (a single cell becomes a 1x1 range).
    pub fn to_range(&self) -> CellRange {
        match self {
            CellReferenceOrRange::Cell(cell) => CellRange::cell(*cell),
            CellReferenceOrRange::Range(range) => *range,
        }
    }

    /// True if the target covers the given cell.
    pub fn covers(&self, cell: &CellReference) -> bool {
        match self {
            CellReferenceOrRange::Cell(c) => c.same_cell(cell),
            CellReferenceOrRange::Range(r) => r.contains(cell),
        }
    }
}

impl fmt::Display for CellReferenceOrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellReferenceOrRange::Cell(cell) => cell.fmt(f),
            CellReferenceOrRange::Range(range) => range.fmt(f),
        }
    }
}
