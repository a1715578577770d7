//! Label names and the mappings that bind them to cells or ranges.

use super::cell::CellReference;
use super::range::CellRange;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Longest accepted label name, in characters.
pub const MAX_LABEL_LENGTH: usize = 255;

/// A case-sensitive, user-defined name such as `Sales_2024` or `tax.rate`.
///
/// Valid names start with a letter, `_` or `\`, continue with letters,
/// digits, `_` or `.`, and never look like a cell reference (`AB12`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let first = chars.next().ok_or_else(|| Error::null("label name"))?;

        if !(first.is_alphabetic() || first == '_' || first == '\\') {
            return Err(Error::invalid(format!(
                "invalid character {:?} at 0 in label {:?}",
                first, name
            )));
        }
        for (pos, ch) in name.char_indices().skip(1) {
            if !(ch.is_alphanumeric() || ch == '_' || ch == '.') {
                return Err(Error::invalid(format!(
                    "invalid character {:?} at {} in label {:?}",
                    ch, pos, name
                )));
            }
        }
        if name.chars().count() > MAX_LABEL_LENGTH {
            return Err(Error::invalid(format!(
                "label longer than {} characters",
                MAX_LABEL_LENGTH
            )));
        }
        if crate::parser::is_cell_reference_text(&name) {
            return Err(Error::invalid(format!(
                "label {:?} is a cell reference",
                name
            )));
        }

        Ok(Self(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LabelName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LabelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LabelName::new(s)
    }
}

impl TryFrom<String> for LabelName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        LabelName::new(value)
    }
}

impl From<LabelName> for String {
    fn from(value: LabelName) -> Self {
        value.0
    }
}

/// What a label points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabelTarget {
    Cell(CellReference),
    Range(CellRange),
    /// Another label; resolution follows the chain.
    Label(LabelName),
}

impl fmt::Display for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelTarget::Cell(cell) => cell.fmt(f),
            LabelTarget::Range(range) => range.fmt(f),
            LabelTarget::Label(label) => label.fmt(f),
        }
    }
}

impl From<CellReference> for LabelTarget {
    fn from(cell: CellReference) -> Self {
        LabelTarget::Cell(cell)
    }
}

impl From<CellRange> for LabelTarget {
    fn from(range: CellRange) -> Self {
        LabelTarget::Range(range)
    }
}

impl From<LabelName> for LabelTarget {
    fn from(label: LabelName) -> Self {
        LabelTarget::Label(label)
    }
}

/// Binding of one label to its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLabelMapping")]
pub struct LabelMapping {
    label: LabelName,
    target: LabelTarget,
}

impl LabelMapping {
    /// Create a mapping. A label may not target itself.
    pub fn new(label: LabelName, target: impl Into<LabelTarget>) -> Result<Self> {
        let target = target.into();
        if matches!(&target, LabelTarget::Label(other) if *other == label) {
            return Err(Error::invalid(format!("label {} cannot target itself", label)));
        }
        Ok(Self { label, target })
    }

    #[inline]
    pub fn label(&self) -> &LabelName {
        &self.label
    }

    #[inline]
    pub fn target(&self) -> &LabelTarget {
        &self.target
    }

    /// Same label bound to a different target.
    pub fn with_target(&self, target: impl Into<LabelTarget>) -> Result<Self> {
        Self::new(self.label.clone(), target)
    }
}

#[derive(Deserialize)]
struct RawLabelMapping {
    label: LabelName,
    target: LabelTarget,
}

impl TryFrom<RawLabelMapping> for LabelMapping {
    type Error = Error;

    fn try_from(raw: RawLabelMapping) -> Result<Self> {
        LabelMapping::new(raw.label, raw.target)
    }
}

impl fmt::Display for LabelMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label, self.target)
    }
}
