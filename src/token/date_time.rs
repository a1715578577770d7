//! Extraction of chrono values from date/time token trees.
//!
//! The tree is walked with [`DateTimeComponentVisitor`], which collects each
//! component from the leaves it recognises. Whole `Date`, `Time` and
//! `DateTime` value tokens contribute all of their components, so a tree may
//! mix both forms as long as they agree.

use super::value::Meridiem;
use super::visitor::{TokenVisitor, Visiting};
use super::{ParentToken, Token, ValueToken};
use crate::common::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::Debug;

/// Date of a tree holding year, month and day components.
pub fn to_local_date(token: &Token) -> Result<NaiveDate> {
    DateTimeComponentVisitor::collect(token)?.date()
}

/// Time of a tree holding at least hour and minute components.
pub fn to_local_time(token: &Token) -> Result<NaiveTime> {
    DateTimeComponentVisitor::collect(token)?.time()
}

/// Date and time of a tree holding both sets of components.
pub fn to_local_date_time(token: &Token) -> Result<NaiveDateTime> {
    let components = DateTimeComponentVisitor::collect(token)?;
    Ok(NaiveDateTime::new(components.date()?, components.time()?))
}

/// Accumulates date/time components while visiting a tree.
///
/// The first conflicting component is remembered and reported by
/// [`DateTimeComponentVisitor::finish`]; once a conflict is seen, remaining
/// parents are skipped.
#[derive(Debug, Default)]
pub struct DateTimeComponentVisitor {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    // Hour components, read on the 12-hour clock when a meridiem is present.
    hour: Option<u32>,
    // Hours of whole time values, always on the 24-hour clock.
    clock_hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
    meridiem: Option<Meridiem>,
    conflict: Option<Error>,
}

/// Components gathered from a tree, checked for conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeComponents {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// Hour on the 24-hour clock, after applying any AM/PM marker.
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub millisecond: Option<u32>,
}

impl DateTimeComponentVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `token` and return its components.
    pub fn collect(token: &Token) -> Result<DateTimeComponents> {
        let mut visitor = Self::new();
        token.accept(&mut visitor);
        visitor.finish()
    }

    /// Report the first conflict, or the gathered components.
    pub fn finish(self) -> Result<DateTimeComponents> {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }

        let component = match (self.hour, self.meridiem) {
            (Some(hour), Some(meridiem)) => Some(meridiem.to_24_hour(hour).ok_or_else(|| {
                Error::invalid(format!("hour {} is not a 12-hour clock value", hour))
            })?),
            (hour, _) => hour,
        };

        let hour = match (component, self.clock_hour, self.meridiem) {
            (Some(a), Some(b), _) if a != b => {
                return Err(Error::illegal_state(format!("conflicting hour: {} and {}", a, b)));
            },
            (None, Some(clock), Some(meridiem)) if (clock >= 12) != (meridiem == Meridiem::Pm) => {
                return Err(Error::illegal_state(format!(
                    "conflicting AM/PM: {:?} for hour {}",
                    meridiem, clock
                )));
            },
            (None, None, Some(_)) => return Err(Error::invalid("AM/PM marker without an hour")),
            (component, clock, _) => component.or(clock),
        };

        Ok(DateTimeComponents {
            year: self.year,
            month: self.month,
            day: self.day,
            hour,
            minute: self.minute,
            second: self.second,
            millisecond: self.millisecond,
        })
    }

    fn record<T: Copy + PartialEq + Debug>(
        slot: &mut Option<T>,
        conflict: &mut Option<Error>,
        name: &str,
        value: T,
    ) {
        match *slot {
            Some(existing) if existing != value => {
                if conflict.is_none() {
                    *conflict = Some(Error::illegal_state(format!(
                        "conflicting {}: {:?} and {:?}",
                        name, existing, value
                    )));
                }
            },
            _ => *slot = Some(value),
        }
    }

    fn record_date(&mut self, date: NaiveDate) {
        Self::record(&mut self.year, &mut self.conflict, "year", date.year());
        Self::record(&mut self.month, &mut self.conflict, "month", date.month());
        Self::record(&mut self.day, &mut self.conflict, "day", date.day());
    }

    fn record_time(&mut self, time: NaiveTime) {
        Self::record(&mut self.clock_hour, &mut self.conflict, "hour", time.hour());
        Self::record(&mut self.minute, &mut self.conflict, "minute", time.minute());
        Self::record(&mut self.second, &mut self.conflict, "second", time.second());
        Self::record(
            &mut self.millisecond,
            &mut self.conflict,
            "millisecond",
            time.nanosecond() / 1_000_000,
        );
    }
}

impl DateTimeComponents {
    /// Build a date; every component must be present and form a real day.
    pub fn date(&self) -> Result<NaiveDate> {
        let year = self.year.ok_or_else(|| Error::invalid("missing year"))?;
        let month = self.month.ok_or_else(|| Error::invalid("missing month"))?;
        let day = self.day.ok_or_else(|| Error::invalid("missing day"))?;
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            Error::invalid(format!("{:04}-{:02}-{:02} is not a valid date", year, month, day))
        })
    }

    /// Build a time; hour and minute are required, seconds default to zero.
    pub fn time(&self) -> Result<NaiveTime> {
        let hour = self.hour.ok_or_else(|| Error::invalid("missing hour"))?;
        let minute = self.minute.ok_or_else(|| Error::invalid("missing minute"))?;
        let second = self.second.unwrap_or(0);
        let millisecond = self.millisecond.unwrap_or(0);
        NaiveTime::from_hms_milli_opt(hour, minute, second, millisecond).ok_or_else(|| {
            Error::invalid(format!(
                "{:02}:{:02}:{:02}.{:03} is not a valid time",
                hour, minute, second, millisecond
            ))
        })
    }
}

impl TokenVisitor for DateTimeComponentVisitor {
    fn start_visit(&mut self, _token: &ParentToken) -> Visiting {
        if self.conflict.is_some() {
            Visiting::Skip
        } else {
            Visiting::Continue
        }
    }

    fn visit_year(&mut self, _token: &ValueToken, year: i32) {
        Self::record(&mut self.year, &mut self.conflict, "year", year);
    }

    fn visit_month_number(&mut self, _token: &ValueToken, month: u32) {
        Self::record(&mut self.month, &mut self.conflict, "month", month);
    }

    fn visit_month_name(&mut self, _token: &ValueToken, month: u32) {
        Self::record(&mut self.month, &mut self.conflict, "month", month);
    }

    fn visit_day(&mut self, _token: &ValueToken, day: u32) {
        Self::record(&mut self.day, &mut self.conflict, "day", day);
    }

    fn visit_hour(&mut self, _token: &ValueToken, hour: u32) {
        Self::record(&mut self.hour, &mut self.conflict, "hour", hour);
    }

    fn visit_minute(&mut self, _token: &ValueToken, minute: u32) {
        Self::record(&mut self.minute, &mut self.conflict, "minute", minute);
    }

    fn visit_second(&mut self, _token: &ValueToken, second: u32) {
        Self::record(&mut self.second, &mut self.conflict, "second", second);
    }

    fn visit_millisecond(&mut self, _token: &ValueToken, millisecond: u32) {
        Self::record(&mut self.millisecond, &mut self.conflict, "millisecond", millisecond);
    }

    fn visit_am_pm(&mut self, _token: &ValueToken, meridiem: Meridiem) {
        Self::record(&mut self.meridiem, &mut self.conflict, "AM/PM", meridiem);
    }

    fn visit_date(&mut self, _token: &ValueToken, date: NaiveDate) {
        self.record_date(date);
    }

    fn visit_time(&mut self, _token: &ValueToken, time: NaiveTime) {
        self.record_time(time);
    }

    fn visit_date_time(&mut self, _token: &ValueToken, date_time: NaiveDateTime) {
        self.record_date(date_time.date());
        self.record_time(date_time.time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ParentKind, SymbolKind, TokenValue};

    fn leaf(value: TokenValue, text: &str) -> Token {
        Token::leaf(value, text).unwrap()
    }

    fn sep(text: &str) -> Token {
        Token::symbol(SymbolKind::Separator, text).unwrap()
    }

    fn date_time_tree() -> Token {
        let date = Token::parent(
            ParentKind::Date,
            vec![
                leaf(TokenValue::Year(1999), "1999"),
                sep("/"),
                leaf(TokenValue::MonthNumber(12), "12"),
                sep("/"),
                leaf(TokenValue::Day(31), "31"),
            ],
            "1999/12/31",
        )
        .unwrap();
        let time = Token::parent(
            ParentKind::Time,
            vec![
                leaf(TokenValue::Hour(12), "12"),
                sep(":"),
                leaf(TokenValue::Minute(58), "58"),
                sep(":"),
                leaf(TokenValue::Second(59), "59"),
            ],
            "12:58:59",
        )
        .unwrap();
        Token::parent(
            ParentKind::DateTime,
            vec![date, Token::symbol(SymbolKind::Whitespace, " ").unwrap(), time],
            "1999/12/31 12:58:59",
        )
        .unwrap()
    }

    #[test]
    fn test_to_local_date_time() {
        let token = date_time_tree();
        let expected = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(12, 58, 59)
            .unwrap();
        assert_eq!(to_local_date_time(&token).unwrap(), expected);
        assert_eq!(to_local_date_time(&token).unwrap().to_string(), "1999-12-31 12:58:59");
        assert_eq!(
            to_local_date(&token).unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
        assert_eq!(
            to_local_time(&token).unwrap(),
            NaiveTime::from_hms_opt(12, 58, 59).unwrap()
        );
    }

    #[test]
    fn test_missing_component_is_invalid_argument() {
        let token = Token::parent(
            ParentKind::Date,
            vec![
                leaf(TokenValue::Year(2024), "2024"),
                sep("-"),
                leaf(TokenValue::MonthNumber(2), "02"),
            ],
            "2024-02",
        )
        .unwrap();
        assert_eq!(
            to_local_date(&token),
            Err(Error::InvalidArgument("missing day".to_string()))
        );
        assert!(matches!(to_local_time(&token), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_conflicting_components_are_illegal_state() {
        let token = Token::parent(
            ParentKind::Time,
            vec![
                leaf(TokenValue::Hour(1), "1"),
                sep(":"),
                leaf(TokenValue::Hour(2), "2"),
            ],
            "1:2",
        )
        .unwrap();
        assert!(matches!(to_local_time(&token), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_agreeing_duplicates_are_accepted() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let token = Token::parent(
            ParentKind::Expression,
            vec![
                leaf(TokenValue::Date(date), "2020-02-29"),
                leaf(TokenValue::Year(2020), ""),
            ],
            "2020-02-29",
        )
        .unwrap();
        assert_eq!(to_local_date(&token).unwrap(), date);
    }

    #[test]
    fn test_invalid_calendar_date() {
        let token = Token::parent(
            ParentKind::Date,
            vec![
                leaf(TokenValue::Year(2023), "2023"),
                leaf(TokenValue::MonthName(2), "Feb"),
                leaf(TokenValue::Day(30), "30"),
            ],
            "2023Feb30",
        )
        .unwrap();
        assert!(matches!(to_local_date(&token), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_meridiem_adjusts_hour() {
        let token = Token::parent(
            ParentKind::Time,
            vec![
                leaf(TokenValue::Hour(12), "12"),
                sep(":"),
                leaf(TokenValue::Minute(5), "05"),
                Token::symbol(SymbolKind::Whitespace, " ").unwrap(),
                leaf(TokenValue::AmPm(Meridiem::Am), "AM"),
            ],
            "12:05 AM",
        )
        .unwrap();
        assert_eq!(to_local_time(&token).unwrap(), NaiveTime::from_hms_opt(0, 5, 0).unwrap());

        let token = Token::parent(
            ParentKind::Time,
            vec![
                leaf(TokenValue::Hour(13), "13"),
                leaf(TokenValue::Minute(0), "00"),
                leaf(TokenValue::AmPm(Meridiem::Pm), "PM"),
            ],
            "1300PM",
        )
        .unwrap();
        assert!(matches!(to_local_time(&token), Err(Error::InvalidArgument(_))));
    }

    fn time_with_meridiem(time: NaiveTime, meridiem: Meridiem) -> Token {
        Token::parent(
            ParentKind::Time,
            vec![
                leaf(TokenValue::Time(time), "time"),
                leaf(TokenValue::AmPm(meridiem), " marker"),
            ],
            "time marker",
        )
        .unwrap()
    }

    #[test]
    fn test_whole_time_keeps_24_hour_clock() {
        let one_pm = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(to_local_time(&time_with_meridiem(one_pm, Meridiem::Pm)), Ok(one_pm));
        assert_eq!(to_local_time(&time_with_meridiem(midnight, Meridiem::Am)), Ok(midnight));

        let one_am = NaiveTime::from_hms_opt(1, 0, 0).unwrap();
        assert!(matches!(
            to_local_time(&time_with_meridiem(one_am, Meridiem::Pm)),
            Err(Error::IllegalState(_))
        ));
    }

    #[test]
    fn test_whole_time_reconciles_with_hour_component() {
        let time = NaiveTime::from_hms_opt(15, 30, 0).unwrap();
        let agreeing = Token::parent(
            ParentKind::Expression,
            vec![
                leaf(TokenValue::Time(time), "15:30"),
                leaf(TokenValue::Hour(3), ""),
                leaf(TokenValue::AmPm(Meridiem::Pm), ""),
            ],
            "15:30",
        )
        .unwrap();
        assert_eq!(to_local_time(&agreeing), Ok(time));

        let disagreeing = Token::parent(
            ParentKind::Expression,
            vec![
                leaf(TokenValue::Time(time), "15:30"),
                leaf(TokenValue::Hour(3), ""),
                leaf(TokenValue::AmPm(Meridiem::Am), ""),
            ],
            "15:30",
        )
        .unwrap();
        assert!(matches!(to_local_time(&disagreeing), Err(Error::IllegalState(_))));
    }
}
