use super::{CellValue, Conversion, ConversionError, Converter, ConverterContext, ValueType};
use crate::common::Result;
use crate::parser::parse_text_pattern;
use crate::token::visitor::TokenVisitor;
use crate::token::{SymbolToken, Token, ValueToken};

/// Renders text through a text format pattern such as `"Total: "@`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPatternConverter {
    pattern: Token,
}

impl TextPatternConverter {
    /// Parse `pattern`; see [`parse_text_pattern`].
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: parse_text_pattern(pattern)?,
        })
    }

    /// The parsed pattern tree.
    pub fn pattern(&self) -> &Token {
        &self.pattern
    }

    pub fn render(&self, text: &str) -> String {
        let mut renderer = Renderer {
            value: text,
            out: String::with_capacity(self.pattern.text().len() + text.len()),
        };
        self.pattern.accept(&mut renderer);
        renderer.out
    }
}

struct Renderer<'a> {
    value: &'a str,
    out: String,
}

impl TokenVisitor for Renderer<'_> {
    fn visit_text_placeholder(&mut self, _token: &SymbolToken) {
        self.out.push_str(self.value);
    }

    fn visit_whitespace(&mut self, token: &SymbolToken) {
        self.out.push_str(token.text());
    }

    fn visit_text(&mut self, _token: &ValueToken, text: &str) {
        self.out.push_str(text);
    }
}

impl Converter<ConverterContext> for TextPatternConverter {
    fn can_convert(&self, value: &CellValue, target: ValueType, _context: &ConverterContext) -> bool {
        matches!((value, target), (CellValue::Text(_), ValueType::Text))
    }

    fn convert(&self, value: &CellValue, target: ValueType, _context: &ConverterContext) -> Conversion {
        match (value, target) {
            (CellValue::Text(text), ValueType::Text) => Ok(CellValue::Text(self.render(text))),
            _ => Err(ConversionError::unsupported(value, target)),
        }
    }
}
