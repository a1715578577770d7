//! Parsing of cell and range references in A1 notation.

use crate::common::{Error, Result};
use crate::reference::{CellRange, CellReference, CellReferenceOrRange, ReferenceKind};

/// Parse a single-cell reference.
///
/// Examples:
/// - `A1`
/// - `$B$2`
/// - `c$10` (column letters are case-insensitive)
///
/// References are sheet-local, so a sheet qualifier such as `Sheet2!A1` is
/// rejected.
pub fn parse_cell_reference(input: &str) -> Result<CellReference> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::null("cell reference"));
    }
    reject_sheet_qualifier(s)?;

    let parts = split_a1(s).ok_or_else(|| invalid_reference(input))?;
    log::trace!("event=reference_parse module=parser input={:?} parts={:?}", input, parts);
    parts.into_reference()
}

/// Parse a cell range reference. A lone cell is accepted as a 1x1 range.
///
/// Examples:
/// - `A1:B3`
/// - `$A$1:$C$10`
/// - `B2`
pub fn parse_cell_range(input: &str) -> Result<CellRange> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::null("cell range"));
    }
    reject_sheet_qualifier(s)?;

    let mut parts = s.split(':');
    let start_str = parts.next().unwrap_or_default().trim();
    let end_str = parts.next().map(str::trim);
    if parts.next().is_some() {
        return Err(invalid_reference(input));
    }

    let start = parse_cell_reference(start_str)?;
    match end_str {
        Some(end_str) => CellRange::new(start, parse_cell_reference(end_str)?),
        None => Ok(CellRange::cell(start)),
    }
}

/// Parse either form, keeping a lone cell as a cell.
pub fn parse_cell_reference_or_range(input: &str) -> Result<CellReferenceOrRange> {
    if input.contains(':') {
        parse_cell_range(input).map(CellReferenceOrRange::Range)
    } else {
        parse_cell_reference(input).map(CellReferenceOrRange::Cell)
    }
}

/// True if the text has the shape of a relative A1 reference (`AB12`).
///
/// Used to keep label names from shadowing cells, so the coordinate limits
/// are deliberately not checked here.
pub fn is_cell_reference_text(text: &str) -> bool {
    match split_a1(text) {
        Some(parts) => {
            parts.column_kind == ReferenceKind::Relative
                && parts.row_kind == ReferenceKind::Relative
                && parts.column_letters.len() <= 3
        },
        None => false,
    }
}

#[derive(Debug)]
struct A1Parts<'a> {
    column_kind: ReferenceKind,
    column_letters: &'a str,
    row_kind: ReferenceKind,
    row_digits: &'a str,
}

impl A1Parts<'_> {
    fn into_reference(self) -> Result<CellReference> {
        let column = column_letters_to_index(self.column_letters)
            .ok_or_else(|| Error::invalid(format!("column {:?} out of range", self.column_letters)))?;
        let row = self
            .row_digits
            .parse::<u32>()
            .map_err(|_| Error::invalid(format!("row {:?} out of range", self.row_digits)))?;
        CellReference::with_kinds(column, self.column_kind, row, self.row_kind)
    }
}

fn split_a1(cell: &str) -> Option<A1Parts<'_>> {
    let bytes = cell.as_bytes();
    let mut pos = 0;

    let column_kind = if bytes.first() == Some(&b'$') {
        pos += 1;
        ReferenceKind::Absolute
    } else {
        ReferenceKind::Relative
    };

    let letters_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    if pos == letters_start {
        return None;
    }
    let column_letters = &cell[letters_start..pos];

    let row_kind = if bytes.get(pos) == Some(&b'$') {
        pos += 1;
        ReferenceKind::Absolute
    } else {
        ReferenceKind::Relative
    };

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }

    // No trailing characters allowed.
    if pos != bytes.len() {
        return None;
    }

    Some(A1Parts {
        column_kind,
        column_letters,
        row_kind,
        row_digits: &cell[digits_start..pos],
    })
}

fn column_letters_to_index(col: &str) -> Option<u32> {
    let mut result: u32 = 0;
    for ch in col.chars() {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return None;
        }
        let value = (ch as u8).wrapping_sub(b'A') as u32 + 1;
        result = result.checked_mul(26)?;
        result = result.checked_add(value)?;
    }
    Some(result)
}

fn reject_sheet_qualifier(s: &str) -> Result<()> {
    if s.contains('!') {
        return Err(Error::invalid(format!(
            "sheet-qualified reference {:?} is not supported",
            s
        )));
    }
    Ok(())
}

fn invalid_reference(input: &str) -> Error {
    Error::invalid(format!("invalid cell reference {:?}", input))
}
