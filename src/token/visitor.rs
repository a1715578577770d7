//! Visitor protocol over token trees.
//!
//! [`Token::accept`](super::Token::accept) dispatches every node to the
//! callback for its concrete kind. Parents receive a `start_visit_*` /
//! `end_visit_*` pair around their children; leaves receive a single
//! `visit_*` call.
//!
//! Every specific callback has a default that forwards to a generic one:
//! parent callbacks forward to [`TokenVisitor::start_visit`] /
//! [`TokenVisitor::end_visit`], symbol callbacks to
//! [`TokenVisitor::visit_symbol`] and value callbacks to
//! [`TokenVisitor::visit_value`]. A visitor that only overrides the generic
//! callbacks therefore still sees every node, including kinds added later.

use super::value::Meridiem;
use super::{ParentToken, SymbolToken, ValueToken};
use crate::reference::{CellReference, LabelName};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Returned by `start_visit*` to decide whether a parent's children are
/// visited. The matching `end_visit*` fires either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visiting {
    #[default]
    Continue,
    Skip,
}

#[allow(unused_variables)]
pub trait TokenVisitor {
    // Generic fallbacks

    fn start_visit(&mut self, token: &ParentToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit(&mut self, token: &ParentToken) {}

    fn visit_symbol(&mut self, token: &SymbolToken) {}

    fn visit_value(&mut self, token: &ValueToken) {}

    // Parents

    fn start_visit_date(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_date(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    fn start_visit_time(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_time(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    fn start_visit_date_time(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_date_time(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    fn start_visit_text_pattern(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_text_pattern(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    fn start_visit_range(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_range(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    fn start_visit_group(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_group(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    fn start_visit_expression(&mut self, token: &ParentToken) -> Visiting {
        self.start_visit(token)
    }

    fn end_visit_expression(&mut self, token: &ParentToken) {
        self.end_visit(token)
    }

    // Symbols

    /// Arithmetic and comparison operators.
    fn visit_operator(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_percent(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_currency(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_decimal_point(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_group_separator(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    /// Opening or closing parenthesis.
    fn visit_parenthesis(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_separator(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_whitespace(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    fn visit_text_placeholder(&mut self, token: &SymbolToken) {
        self.visit_symbol(token)
    }

    // Values

    fn visit_year(&mut self, token: &ValueToken, year: i32) {
        self.visit_value(token)
    }

    fn visit_month_number(&mut self, token: &ValueToken, month: u32) {
        self.visit_value(token)
    }

    fn visit_month_name(&mut self, token: &ValueToken, month: u32) {
        self.visit_value(token)
    }

    fn visit_day(&mut self, token: &ValueToken, day: u32) {
        self.visit_value(token)
    }

    fn visit_hour(&mut self, token: &ValueToken, hour: u32) {
        self.visit_value(token)
    }

    fn visit_minute(&mut self, token: &ValueToken, minute: u32) {
        self.visit_value(token)
    }

    fn visit_second(&mut self, token: &ValueToken, second: u32) {
        self.visit_value(token)
    }

    fn visit_millisecond(&mut self, token: &ValueToken, millisecond: u32) {
        self.visit_value(token)
    }

    fn visit_am_pm(&mut self, token: &ValueToken, meridiem: Meridiem) {
        self.visit_value(token)
    }

    fn visit_date(&mut self, token: &ValueToken, date: NaiveDate) {
        self.visit_value(token)
    }

    fn visit_time(&mut self, token: &ValueToken, time: NaiveTime) {
        self.visit_value(token)
    }

    fn visit_date_time(&mut self, token: &ValueToken, date_time: NaiveDateTime) {
        self.visit_value(token)
    }

    fn visit_text(&mut self, token: &ValueToken, text: &str) {
        self.visit_value(token)
    }

    fn visit_number(&mut self, token: &ValueToken, number: f64) {
        self.visit_value(token)
    }

    fn visit_label(&mut self, token: &ValueToken, label: &LabelName) {
        self.visit_value(token)
    }

    fn visit_cell_reference(&mut self, token: &ValueToken, cell: &CellReference) {
        self.visit_value(token)
    }
}
