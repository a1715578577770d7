//! Visitors that render a token tree back to text.

use super::visitor::{TokenVisitor, Visiting};
use super::{ParentToken, SymbolToken, Token, ValueToken};
use std::fmt::Write;

/// Rebuilds the source text from the leaves, in traversal order.
///
/// For any well-formed tree the result equals the root's text.
#[derive(Debug, Default)]
pub struct TextPrinter {
    out: String,
}

impl TextPrinter {
    pub fn print(token: &Token) -> String {
        let mut printer = Self::default();
        token.accept(&mut printer);
        printer.out
    }
}

impl TokenVisitor for TextPrinter {
    fn visit_symbol(&mut self, token: &SymbolToken) {
        self.out.push_str(token.text());
    }

    fn visit_value(&mut self, token: &ValueToken) {
        self.out.push_str(token.text());
    }
}

/// Renders one line per node, indented by depth, for diagnostics and tests.
///
/// ```text
/// Date "1999/12/31"
///   Year(1999) "1999"
///   Separator "/"
/// ```
#[derive(Debug, Default)]
pub struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    pub fn print(token: &Token) -> String {
        let mut printer = Self::default();
        token.accept(&mut printer);
        printer.out
    }

    fn line(&mut self, label: std::fmt::Arguments<'_>, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        // Writing to a String cannot fail.
        let _ = writeln!(self.out, "{} {:?}", label, text);
    }
}

impl TokenVisitor for TreePrinter {
    fn start_visit(&mut self, token: &ParentToken) -> Visiting {
        self.line(format_args!("{:?}", token.kind()), token.text());
        self.depth += 1;
        Visiting::Continue
    }

    fn end_visit(&mut self, _token: &ParentToken) {
        self.depth -= 1;
    }

    fn visit_symbol(&mut self, token: &SymbolToken) {
        self.line(format_args!("{:?}", token.kind()), token.text());
    }

    fn visit_value(&mut self, token: &ValueToken) {
        self.line(format_args!("{:?}", token.value()), token.text());
    }
}
