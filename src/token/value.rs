// Scalar payloads carried by value tokens

use crate::common::{Error, Result};
use crate::reference::{CellReference, LabelName};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Morning or afternoon marker in a 12-hour time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Convert a 12-hour clock hour (1..=12) into 0..=23.
    pub fn to_24_hour(self, hour: u32) -> Option<u32> {
        if !(1..=12).contains(&hour) {
            return None;
        }
        Some(match (self, hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        })
    }
}

/// Semantic value of a value token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    Year(i32),
    MonthNumber(u32),
    /// Month written as a name; the payload is still 1..=12
    MonthName(u32),
    Day(u32),
    Hour(u32),
    Minute(u32),
    Second(u32),
    Millisecond(u32),
    AmPm(Meridiem),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    /// Literal text; the only value that may be empty
    Text(String),
    Number(f64),
    Label(LabelName),
    CellReference(CellReference),
}

impl TokenValue {
    /// Range-check component values.
    pub(crate) fn validate(&self) -> Result<()> {
        let (name, value, range) = match *self {
            TokenValue::MonthNumber(m) | TokenValue::MonthName(m) => ("month", m, 1..=12),
            TokenValue::Day(d) => ("day", d, 1..=31),
            TokenValue::Hour(h) => ("hour", h, 0..=23),
            TokenValue::Minute(m) => ("minute", m, 0..=59),
            TokenValue::Second(s) => ("second", s, 0..=59),
            TokenValue::Millisecond(ms) => ("millisecond", ms, 0..=999),
            TokenValue::Number(n) if !n.is_finite() => {
                return Err(Error::invalid(format!("number {} is not finite", n)));
            },
            _ => return Ok(()),
        };
        if !range.contains(&value) {
            return Err(Error::invalid(format!(
                "{} {} outside {}..={}",
                name,
                value,
                range.start(),
                range.end()
            )));
        }
        Ok(())
    }
}
