//! Cell value conversion.
//!
//! A [`Converter`] turns a [`CellValue`] into another value of a requested
//! [`ValueType`]. Failures are plain values ([`ConversionError`]) so callers
//! can chain converters without unwinding; see [`ConversionPipeline`].
//!
//! ```
//! use spreadsheet_core::convert::{
//!     BooleanConverter, CellValue, ConversionPipeline, Converter, ConverterContext,
//!     TextPatternConverter, ValueType,
//! };
//!
//! let context = ConverterContext::default();
//! let pattern = TextPatternConverter::new("\"Paid: \"@").unwrap();
//! let pipeline = ConversionPipeline::new(&BooleanConverter, &pattern);
//!
//! let shown = pipeline.convert(&CellValue::Bool(true), ValueType::Text, &context);
//! assert_eq!(shown, Ok(CellValue::Text("Paid: TRUE".to_string())));
//! ```

mod boolean;
mod number;
mod pipeline;
mod text;

pub use boolean::BooleanConverter;
pub use number::NumberConverter;
pub use pipeline::ConversionPipeline;
pub use text::TextPatternConverter;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Empty cell
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    /// Error value such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// The value's type, or `None` for [`CellValue::Empty`] and errors.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            CellValue::Bool(_) => Some(ValueType::Boolean),
            CellValue::Number(_) => Some(ValueType::Number),
            CellValue::Text(_) => Some(ValueType::Text),
            CellValue::Date(_) => Some(ValueType::Date),
            CellValue::Time(_) => Some(ValueType::Time),
            CellValue::DateTime(_) => Some(ValueType::DateTime),
            CellValue::Empty | CellValue::Error(_) => None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => f.write_str(ryu::Buffer::new().format(*n)),
            CellValue::Text(s) | CellValue::Error(s) => f.write_str(s),
            CellValue::Date(d) => d.fmt(f),
            CellValue::Time(t) => t.fmt(f),
            CellValue::DateTime(dt) => dt.fmt(f),
        }
    }
}

/// Target type of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Number,
    Text,
    Date,
    Time,
    DateTime,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::Text => "text",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::DateTime => "date-time",
        };
        f.write_str(name)
    }
}

/// A failed conversion with its diagnostic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConversionError(String);

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub(crate) fn unsupported(value: &CellValue, target: ValueType) -> Self {
        match value.value_type() {
            Some(from) => Self(format!("cannot convert {} to {}", from, target)),
            None => Self(format!("cannot convert {:?} to {}", value, target)),
        }
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Outcome of a single conversion.
pub type Conversion = std::result::Result<CellValue, ConversionError>;

/// Converts cell values to a target type under a context `C`.
pub trait Converter<C> {
    fn can_convert(&self, value: &CellValue, target: ValueType, context: &C) -> bool;

    fn convert(&self, value: &CellValue, target: ValueType, context: &C) -> Conversion;
}

impl<C, T: Converter<C> + ?Sized> Converter<C> for &T {
    fn can_convert(&self, value: &CellValue, target: ValueType, context: &C) -> bool {
        (**self).can_convert(value, target, context)
    }

    fn convert(&self, value: &CellValue, target: ValueType, context: &C) -> Conversion {
        (**self).convert(value, target, context)
    }
}

/// Display settings shared by the built-in converters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterContext {
    /// Text shown for `true`
    pub true_text: String,
    /// Text shown for `false`
    pub false_text: String,
    /// Character written in place of `.` when formatting numbers
    pub decimal_separator: char,
    /// Currency symbol, for converters that render amounts
    pub currency_symbol: String,
}

impl Default for ConverterContext {
    fn default() -> Self {
        Self {
            true_text: "TRUE".to_string(),
            false_text: "FALSE".to_string(),
            decimal_separator: '.',
            currency_symbol: "$".to_string(),
        }
    }
}

impl ConverterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_true_text(mut self, text: impl Into<String>) -> Self {
        self.true_text = text.into();
        self
    }

    pub fn with_false_text(mut self, text: impl Into<String>) -> Self {
        self.false_text = text.into();
        self
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// The configured word for a boolean.
    pub fn boolean_text(&self, value: bool) -> &str {
        if value { &self.true_text } else { &self.false_text }
    }
}
