//! Parsers turning text into references and token trees.
//!
//! - A1 cell references and ranges (`$B$2`, `A1:C3`)
//! - Date/time text read against a format pattern (`yyyy/mm/dd hh:mm:ss`)
//! - Text format patterns (`"Total: "@`)
pub mod date_time;
pub mod reference;
pub mod text_pattern;

pub use date_time::{DateTimeParser, ParserConfig, parse_date, parse_date_time, parse_time};
pub use reference::{
    is_cell_reference_text, parse_cell_range, parse_cell_reference, parse_cell_reference_or_range,
};
pub use text_pattern::parse_text_pattern;
