//! Reading date/time text against a spreadsheet format pattern.
//!
//! A pattern such as `yyyy/mm/dd hh:mm:ss` is compiled once into a list of
//! fields and literals, then matched against input text. The result is a
//! `Date`, `Time` or `DateTime` parent token whose children are the matched
//! component values and the separators between them, so the token text is
//! exactly the input.
//!
//! Supported pattern elements (letters are case-insensitive):
//!
//! | Pattern        | Matches                                     |
//! |----------------|---------------------------------------------|
//! | `yyyy`, `yy`   | year, two-digit years use the config cutoff |
//! | `m`, `mm`      | month number, or minutes next to `h` / `s`  |
//! | `mmm`, `mmmm`  | month name, abbreviated or full             |
//! | `d`, `dd`      | day of month                                |
//! | `h`, `hh`      | hour                                        |
//! | `s`, `ss`      | second                                      |
//! | `.0` - `.000`  | fraction of a second                        |
//! | `AM/PM`, `A/P` | meridiem marker                             |
//! | `"text"`, `\c` | literal text                                |

use crate::common::{Error, Result};
use crate::token::{Meridiem, ParentKind, SymbolKind, Token, TokenValue};
use phf::phf_map;
use smallvec::SmallVec;

/// Month names, full and abbreviated, keyed in lowercase.
static MONTH_NAMES: phf::Map<&'static str, u32> = phf_map! {
    "january" => 1, "jan" => 1,
    "february" => 2, "feb" => 2,
    "march" => 3, "mar" => 3,
    "april" => 4, "apr" => 4,
    "may" => 5,
    "june" => 6, "jun" => 6,
    "july" => 7, "jul" => 7,
    "august" => 8, "aug" => 8,
    "september" => 9, "sep" => 9, "sept" => 9,
    "october" => 10, "oct" => 10,
    "november" => 11, "nov" => 11,
    "december" => 12, "dec" => 12,
};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Two-digit years below this value land in the 2000s, the rest in the
    /// 1900s.
    pub two_digit_year_cutoff: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            two_digit_year_cutoff: 30, // Excel's default window
        }
    }
}

impl ParserConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the two-digit year cutoff
    pub fn with_two_digit_year_cutoff(mut self, cutoff: u32) -> Self {
        self.two_digit_year_cutoff = cutoff.min(100);
        self
    }

    fn expand_year(&self, two_digits: u32) -> i32 {
        let base = if two_digits < self.two_digit_year_cutoff {
            2000
        } else {
            1900
        };
        base + two_digits as i32
    }
}

/// Parse text holding only date fields, e.g. `parse_date("31/12/1999", "dd/mm/yyyy")`.
pub fn parse_date(text: &str, pattern: &str) -> Result<Token> {
    parse_expecting(text, pattern, ParentKind::Date)
}

/// Parse text holding only time fields, e.g. `parse_time("12:58", "hh:mm")`.
pub fn parse_time(text: &str, pattern: &str) -> Result<Token> {
    parse_expecting(text, pattern, ParentKind::Time)
}

/// Parse text holding both date and time fields.
pub fn parse_date_time(text: &str, pattern: &str) -> Result<Token> {
    parse_expecting(text, pattern, ParentKind::DateTime)
}

fn parse_expecting(text: &str, pattern: &str, expected: ParentKind) -> Result<Token> {
    let parser = DateTimeParser::new(pattern)?;
    if parser.kind() != expected {
        return Err(Error::invalid(format!(
            "pattern {:?} describes a {:?}, expected a {:?}",
            pattern,
            parser.kind(),
            expected
        )));
    }
    parser.parse(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year { digits: usize },
    Month,
    MonthName,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond { digits: usize },
    AmPm { short: bool },
    /// `m`/`mm` before it is known whether it means month or minute
    MonthOrMinute,
}

impl Field {
    fn is_date(self) -> bool {
        matches!(self, Field::Year { .. } | Field::Month | Field::MonthName | Field::Day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternItem {
    Field(Field),
    /// Unquoted punctuation or whitespace, matched exactly
    Separator(String),
    /// Quoted or escaped literal, matched exactly
    Literal(String),
}

/// A compiled date/time pattern.
#[derive(Debug, Clone)]
pub struct DateTimeParser {
    items: SmallVec<[PatternItem; 16]>,
    kind: ParentKind,
    config: ParserConfig,
}

impl DateTimeParser {
    /// Compile a pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::null("date/time pattern"));
        }

        let mut items = compile(pattern)?;
        resolve_minutes(&mut items);

        let mut has_date = false;
        let mut has_time = false;
        for item in &items {
            if let PatternItem::Field(field) = item {
                if field.is_date() {
                    has_date = true;
                } else {
                    has_time = true;
                }
            }
        }
        let kind = match (has_date, has_time) {
            (true, true) => ParentKind::DateTime,
            (true, false) => ParentKind::Date,
            (false, true) => ParentKind::Time,
            (false, false) => {
                return Err(Error::invalid(format!(
                    "pattern {:?} has no date or time fields",
                    pattern
                )));
            },
        };

        log::trace!(
            "event=pattern_compile module=parser pattern={:?} kind={:?} items={}",
            pattern,
            kind,
            items.len()
        );

        Ok(Self {
            items,
            kind,
            config: ParserConfig::default(),
        })
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Kind of parent token produced by [`DateTimeParser::parse`].
    #[inline]
    pub fn kind(&self) -> ParentKind {
        self.kind
    }

    /// Match `text` against the pattern.
    pub fn parse(&self, text: &str) -> Result<Token> {
        let mut cursor = Cursor { text, pos: 0 };
        let mut children = Vec::with_capacity(self.items.len());

        for (index, item) in self.items.iter().enumerate() {
            let token = match item {
                PatternItem::Field(field) => self.parse_field(&mut cursor, *field)?,
                PatternItem::Separator(expected) => {
                    let matched = cursor.expect(expected)?;
                    let kind = if matched.chars().all(char::is_whitespace) {
                        SymbolKind::Whitespace
                    } else if matched == "."
                        && matches!(
                            self.items.get(index + 1),
                            Some(PatternItem::Field(Field::Millisecond { .. }))
                        )
                    {
                        SymbolKind::DecimalPoint
                    } else {
                        SymbolKind::Separator
                    };
                    Token::symbol(kind, matched)?
                },
                PatternItem::Literal(expected) => {
                    let matched = cursor.expect(expected)?;
                    Token::leaf(TokenValue::Text(matched.to_string()), matched)?
                },
            };
            children.push(token);
        }

        if cursor.pos != text.len() {
            return Err(Error::invalid(format!(
                "unexpected {:?} at {} in {:?}",
                &text[cursor.pos..],
                cursor.pos,
                text
            )));
        }

        Token::parent(self.kind, children, text)
    }

    fn parse_field(&self, cursor: &mut Cursor<'_>, field: Field) -> Result<Token> {
        let start = cursor.pos;
        let value = match field {
            Field::Year { digits } if digits <= 2 => {
                let (n, _) = cursor.digits(1, 2, "year")?;
                TokenValue::Year(self.config.expand_year(n))
            },
            Field::Year { .. } => {
                let (n, _) = cursor.digits(1, 4, "year")?;
                TokenValue::Year(n as i32)
            },
            Field::Month | Field::MonthOrMinute => {
                TokenValue::MonthNumber(cursor.digits(1, 2, "month")?.0)
            },
            Field::MonthName => {
                let name = cursor.alphabetic();
                let month = MONTH_NAMES
                    .get(name.to_ascii_lowercase().as_str())
                    .copied()
                    .ok_or_else(|| {
                        Error::invalid(format!("unknown month name {:?} at {}", name, start))
                    })?;
                TokenValue::MonthName(month)
            },
            Field::Day => TokenValue::Day(cursor.digits(1, 2, "day")?.0),
            Field::Hour => TokenValue::Hour(cursor.digits(1, 2, "hour")?.0),
            Field::Minute => TokenValue::Minute(cursor.digits(1, 2, "minute")?.0),
            Field::Second => TokenValue::Second(cursor.digits(1, 2, "second")?.0),
            Field::Millisecond { digits } => {
                let (n, len) = cursor.digits(1, digits, "fraction of a second")?;
                TokenValue::Millisecond(n * 10u32.pow(3 - len as u32))
            },
            Field::AmPm { short } => {
                let rest = &cursor.text[cursor.pos..];
                let width = if short { 1 } else { 2 };
                let marker = rest.get(..width).unwrap_or_default().to_ascii_uppercase();
                let meridiem = match (marker.as_str(), short) {
                    ("AM", false) | ("A", true) => Meridiem::Am,
                    ("PM", false) | ("P", true) => Meridiem::Pm,
                    _ => {
                        return Err(Error::invalid(format!(
                            "expected AM/PM at {} in {:?}",
                            start, cursor.text
                        )));
                    },
                };
                cursor.pos += width;
                TokenValue::AmPm(meridiem)
            },
        };
        Token::leaf(value, &cursor.text[start..cursor.pos])
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Read between `min` and `max` ASCII digits; returns the number and the
    /// digit count.
    fn digits(&mut self, min: usize, max: usize, what: &str) -> Result<(u32, usize)> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && end - start < max && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end - start < min {
            return Err(Error::invalid(format!(
                "expected {} digits at {} in {:?}",
                what, start, self.text
            )));
        }
        let n = self.text[start..end]
            .parse::<u32>()
            .map_err(|_| Error::invalid(format!("{} out of range at {}", what, start)))?;
        self.pos = end;
        Ok((n, end - start))
    }

    fn alphabetic(&mut self) -> &'a str {
        let rest = &self.text[self.pos..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !c.is_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn expect(&mut self, expected: &str) -> Result<&'a str> {
        let rest = &self.text[self.pos..];
        if !rest.starts_with(expected) {
            return Err(Error::invalid(format!(
                "expected {:?} at {} in {:?}",
                expected, self.pos, self.text
            )));
        }
        let matched = &rest[..expected.len()];
        self.pos += expected.len();
        Ok(matched)
    }
}

fn compile(pattern: &str) -> Result<SmallVec<[PatternItem; 16]>> {
    let mut items: SmallVec<[PatternItem; 16]> = SmallVec::new();
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    let run_length = |i: usize, target: char| {
        chars[i..]
            .iter()
            .take_while(|c| c.to_ascii_lowercase() == target)
            .count()
    };

    while i < chars.len() {
        let ch = chars[i];
        let lower = ch.to_ascii_lowercase();

        // AM/PM markers
        let rest: String = chars[i..].iter().take(5).collect();
        if rest.eq_ignore_ascii_case("am/pm") {
            items.push(PatternItem::Field(Field::AmPm { short: false }));
            i += 5;
            continue;
        }
        if rest.get(..3).is_some_and(|s| s.eq_ignore_ascii_case("a/p")) {
            items.push(PatternItem::Field(Field::AmPm { short: true }));
            i += 3;
            continue;
        }

        match lower {
            'y' => {
                let n = run_length(i, 'y');
                items.push(PatternItem::Field(Field::Year { digits: n }));
                i += n;
            },
            'm' => {
                let n = run_length(i, 'm');
                let field = match n {
                    1 | 2 => Field::MonthOrMinute,
                    3 | 4 => Field::MonthName,
                    _ => return Err(pattern_error(pattern, i, "too many 'm'")),
                };
                items.push(PatternItem::Field(field));
                i += n;
            },
            'd' | 'h' | 's' => {
                let n = run_length(i, lower);
                if n > 2 {
                    return Err(pattern_error(pattern, i, "unsupported field width"));
                }
                let field = match lower {
                    'd' => Field::Day,
                    'h' => Field::Hour,
                    _ => Field::Second,
                };
                items.push(PatternItem::Field(field));
                i += n;
            },
            '.' if chars.get(i + 1) == Some(&'0') => {
                let n = run_length(i + 1, '0');
                if n > 3 {
                    return Err(pattern_error(pattern, i, "more than 3 fraction digits"));
                }
                items.push(PatternItem::Separator(".".to_string()));
                items.push(PatternItem::Field(Field::Millisecond { digits: n }));
                i += 1 + n;
            },
            '"' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == '"')
                    .ok_or_else(|| pattern_error(pattern, i, "unterminated quote"))?;
                let literal: String = chars[i + 1..i + 1 + close].iter().collect();
                if !literal.is_empty() {
                    items.push(PatternItem::Literal(literal));
                }
                i += close + 2;
            },
            '\\' => {
                let escaped = chars
                    .get(i + 1)
                    .ok_or_else(|| pattern_error(pattern, i, "dangling escape"))?;
                items.push(PatternItem::Literal(escaped.to_string()));
                i += 2;
            },
            c if c.is_alphanumeric() => {
                return Err(pattern_error(pattern, i, "unquoted literal letter or digit"));
            },
            c if c.is_whitespace() => {
                // Merge whitespace runs into one separator.
                let n = chars[i..].iter().take_while(|c| c.is_whitespace()).count();
                items.push(PatternItem::Separator(chars[i..i + n].iter().collect()));
                i += n;
            },
            _ => {
                items.push(PatternItem::Separator(ch.to_string()));
                i += 1;
            },
        }
    }

    Ok(items)
}

/// `m`/`mm` means minutes right after an hour or right before a second
/// (literals in between are ignored), and months otherwise.
fn resolve_minutes(items: &mut [PatternItem]) {
    let fields: Vec<(usize, Field)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            PatternItem::Field(f) => Some((i, *f)),
            _ => None,
        })
        .collect();

    for (n, &(index, field)) in fields.iter().enumerate() {
        if field != Field::MonthOrMinute {
            continue;
        }
        let after_hour = n > 0 && fields[n - 1].1 == Field::Hour;
        let before_second = fields.get(n + 1).is_some_and(|&(_, f)| f == Field::Second);
        items[index] = PatternItem::Field(if after_hour || before_second {
            Field::Minute
        } else {
            Field::Month
        });
    }
}

fn pattern_error(pattern: &str, index: usize, message: &str) -> Error {
    Error::invalid(format!("{} at {} in pattern {:?}", message, index, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::date_time::{to_local_date, to_local_date_time, to_local_time};
    use crate::token::printer::TextPrinter;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_parse_date_time_round_trip() {
        let token = parse_date_time("1999/12/31 12:58:59", "yyyy/mm/dd hh:mm:ss").unwrap();
        assert_eq!(token.text(), "1999/12/31 12:58:59");
        assert_eq!(TextPrinter::print(&token), token.text());
        assert_eq!(
            to_local_date_time(&token).unwrap().to_string(),
            "1999-12-31 12:58:59"
        );

        let values: Vec<&str> = token.leaves().iter().map(|t| t.text()).collect();
        assert_eq!(
            values,
            vec!["1999", "/", "12", "/", "31", " ", "12", ":", "58", ":", "59"]
        );
    }

    #[test]
    fn test_month_versus_minute() {
        let parser = DateTimeParser::new("mm/dd hh:mm").unwrap();
        assert_eq!(parser.kind(), ParentKind::DateTime);
        let token = parser.parse("02/03 04:05").unwrap();
        let first = token.children()[0].clone();
        let last = token.children().last().cloned().unwrap();
        assert!(matches!(first, Token::Value(ref v) if *v.value() == TokenValue::MonthNumber(2)));
        assert!(matches!(last, Token::Value(ref v) if *v.value() == TokenValue::Minute(5)));

        // Minute before second, even without an hour.
        let parser = DateTimeParser::new("mm:ss").unwrap();
        assert_eq!(parser.kind(), ParentKind::Time);
    }

    #[test]
    fn test_month_names_and_two_digit_years() {
        let token = parse_date("31-Dec-99", "dd-mmm-yy").unwrap();
        assert_eq!(
            to_local_date(&token).unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );

        let token = parse_date("5 february 07", "d mmmm yy").unwrap();
        assert_eq!(
            to_local_date(&token).unwrap(),
            NaiveDate::from_ymd_opt(2007, 2, 5).unwrap()
        );

        let parser = DateTimeParser::new("yy")
            .unwrap()
            .with_config(ParserConfig::new().with_two_digit_year_cutoff(0));
        let token = parser.parse("07").unwrap();
        assert!(matches!(
            &token.children()[0],
            Token::Value(v) if *v.value() == TokenValue::Year(1907)
        ));

        assert!(matches!(
            parse_date("31-Foo-99", "dd-mmm-yy"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_am_pm_and_fractions() {
        let token = parse_time("07:30:15.25 PM", "hh:mm:ss.00 AM/PM").unwrap();
        assert_eq!(
            to_local_time(&token).unwrap(),
            NaiveTime::from_hms_milli_opt(19, 30, 15, 250).unwrap()
        );
        assert!(token.find_first(|t| matches!(
            t,
            Token::Symbol(s) if s.kind() == SymbolKind::DecimalPoint
        ))
        .is_some());

        let token = parse_time("12:00a", "h:mmA/P").unwrap();
        assert_eq!(to_local_time(&token).unwrap(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_quoted_and_escaped_literals() {
        let token = parse_time("at 9h15", "\"at \"h\\hmm").unwrap();
        assert_eq!(token.text(), "at 9h15");
        assert_eq!(to_local_time(&token).unwrap(), NaiveTime::from_hms_opt(9, 15, 0).unwrap());
        assert!(matches!(
            &token.children()[0],
            Token::Value(v) if *v.value() == TokenValue::Text("at ".to_string())
        ));
    }

    #[test]
    fn test_mismatch_errors() {
        assert!(matches!(
            parse_date("1999-12-31", "yyyy/mm/dd"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_date("1999/13/31", "yyyy/mm/dd"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_date("1999/12/31 extra", "yyyy/mm/dd"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_date("12:00", "hh:mm"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pattern_errors() {
        assert!(matches!(DateTimeParser::new(""), Err(Error::NullArgument(_))));
        assert!(matches!(DateTimeParser::new("/-:"), Err(Error::InvalidArgument(_))));
        assert!(matches!(DateTimeParser::new("yyyy\"oops"), Err(Error::InvalidArgument(_))));
        assert!(matches!(DateTimeParser::new("dddd"), Err(Error::InvalidArgument(_))));
        assert!(matches!(DateTimeParser::new("yyyy x"), Err(Error::InvalidArgument(_))));
    }
}
