//! Immutable token trees produced by parsing formula and format-pattern text.
//!
//! A [`Token`] is one of three shapes:
//!
//! - [`SymbolToken`]: operators and punctuation (`+`, `$`, `.`, `/`, `@`)
//! - [`ValueToken`]: a scalar payload such as a year, a date or a literal
//! - [`ParentToken`]: an ordered sequence of child tokens
//!
//! Every token keeps the exact source text it was parsed from, and a parent's
//! text is always the concatenation of its children's text. Tokens are only
//! built through validating constructors and never mutated afterwards;
//! "changing" a tree means building a new one (see [`Token::replace_if`]).
//!
//! # Example
//!
//! ```
//! use spreadsheet_core::token::{ParentKind, SymbolKind, Token, TokenValue};
//! use spreadsheet_core::token::date_time::to_local_date;
//!
//! let date = Token::parent(
//!     ParentKind::Date,
//!     vec![
//!         Token::leaf(TokenValue::Year(1999), "1999")?,
//!         Token::symbol(SymbolKind::Separator, "/")?,
//!         Token::leaf(TokenValue::MonthNumber(12), "12")?,
//!         Token::symbol(SymbolKind::Separator, "/")?,
//!         Token::leaf(TokenValue::Day(31), "31")?,
//!     ],
//!     "1999/12/31",
//! )?;
//!
//! assert_eq!(to_local_date(&date)?.to_string(), "1999-12-31");
//! # Ok::<(), spreadsheet_core::Error>(())
//! ```

mod kind;
mod value;

pub mod date_time;
pub mod printer;
pub mod visitor;

pub use kind::{ParentKind, SymbolKind};
pub use value::{Meridiem, TokenValue};
pub use visitor::{TokenVisitor, Visiting};

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};

/// A node in a parse tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Symbol(SymbolToken),
    Value(ValueToken),
    Parent(ParentToken),
}

/// Borrowed view of what a token carries besides its text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenPayload<'a> {
    Symbol(SymbolKind),
    Scalar(&'a TokenValue),
    Children(&'a [Token]),
}

impl Token {
    /// Create a symbol token. See [`SymbolToken::new`].
    pub fn symbol(kind: SymbolKind, text: impl Into<String>) -> Result<Token> {
        SymbolToken::new(kind, text).map(Token::Symbol)
    }

    /// Create a value token. See [`ValueToken::new`].
    pub fn leaf(value: TokenValue, text: impl Into<String>) -> Result<Token> {
        ValueToken::new(value, text).map(Token::Value)
    }

    /// Create a parent token. See [`ParentToken::new`].
    pub fn parent(kind: ParentKind, children: Vec<Token>, text: impl Into<String>) -> Result<Token> {
        ParentToken::new(kind, children, text).map(Token::Parent)
    }

    /// Exact source text.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Token::Symbol(t) => &t.text,
            Token::Value(t) => &t.text,
            Token::Parent(t) => &t.text,
        }
    }

    /// Semantic payload: the symbol kind, the scalar value or the children.
    pub fn value(&self) -> TokenPayload<'_> {
        match self {
            Token::Symbol(t) => TokenPayload::Symbol(t.kind),
            Token::Value(t) => TokenPayload::Scalar(&t.value),
            Token::Parent(t) => TokenPayload::Children(&t.children),
        }
    }

    /// Children of a parent token, empty for leaves.
    #[inline]
    pub fn children(&self) -> &[Token] {
        match self {
            Token::Parent(t) => &t.children,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Token::Parent(_))
    }

    /// Double-dispatch into the visitor callback for this token's kind.
    pub fn accept<V: TokenVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Token::Symbol(t) => t.accept(visitor),
            Token::Value(t) => t.accept(visitor),
            Token::Parent(t) => t.accept(visitor),
        }
    }

    /// First token, in depth-first pre-order, matching the predicate.
    pub fn find_first<P>(&self, predicate: P) -> Option<&Token>
    where
        P: Fn(&Token) -> bool,
    {
        fn walk<'t>(token: &'t Token, predicate: &dyn Fn(&Token) -> bool) -> Option<&'t Token> {
            if predicate(token) {
                return Some(token);
            }
            token.children().iter().find_map(|child| walk(child, predicate))
        }
        walk(self, &predicate)
    }

    /// All leaves in traversal order.
    pub fn leaves(&self) -> Vec<&Token> {
        fn walk<'t>(token: &'t Token, out: &mut Vec<&'t Token>) {
            match token {
                Token::Parent(parent) => parent.children.iter().for_each(|c| walk(c, out)),
                leaf => out.push(leaf),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// Build a new tree in which every token matching `predicate` is replaced
    /// by `mapper`'s result. Matching tokens are not descended into; parents
    /// above a replacement get their text recomputed from their new children.
    pub fn replace_if<P, M>(&self, predicate: P, mut mapper: M) -> Token
    where
        P: Fn(&Token) -> bool,
        M: FnMut(&Token) -> Token,
    {
        fn walk(
            token: &Token,
            predicate: &dyn Fn(&Token) -> bool,
            mapper: &mut dyn FnMut(&Token) -> Token,
        ) -> Token {
            if predicate(token) {
                return mapper(token);
            }
            match token {
                Token::Parent(parent) => {
                    let children = parent
                        .children
                        .iter()
                        .map(|child| walk(child, predicate, mapper))
                        .collect::<Vec<_>>();
                    if children == parent.children {
                        token.clone()
                    } else {
                        Token::Parent(ParentToken::from_children(parent.kind, children))
                    }
                },
                leaf => leaf.clone(),
            }
        }
        walk(self, &predicate, &mut mapper)
    }
}

impl From<SymbolToken> for Token {
    fn from(token: SymbolToken) -> Self {
        Token::Symbol(token)
    }
}

impl From<ValueToken> for Token {
    fn from(token: ValueToken) -> Self {
        Token::Value(token)
    }
}

impl From<ParentToken> for Token {
    fn from(token: ParentToken) -> Self {
        Token::Parent(token)
    }
}

/// Operator or punctuation leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "raw::RawSymbol")]
pub struct SymbolToken {
    kind: SymbolKind,
    text: String,
}

impl SymbolToken {
    /// Symbol text must be non-empty, match the kind's fixed text if it has
    /// one, and be all whitespace for [`SymbolKind::Whitespace`].
    pub fn new(kind: SymbolKind, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::null(format!("text for {:?} symbol", kind)));
        }
        if let Some(fixed) = kind.fixed_text() {
            if text != fixed {
                return Err(Error::invalid(format!(
                    "{:?} symbol must be {:?}, got {:?}",
                    kind, fixed, text
                )));
            }
        }
        if kind == SymbolKind::Whitespace && !text.chars().all(char::is_whitespace) {
            return Err(Error::invalid(format!("whitespace symbol contains {:?}", text)));
        }
        Ok(Self { kind, text })
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn accept<V: TokenVisitor + ?Sized>(&self, visitor: &mut V) {
        match self.kind {
            SymbolKind::Percent => visitor.visit_percent(self),
            SymbolKind::Currency => visitor.visit_currency(self),
            SymbolKind::DecimalPoint => visitor.visit_decimal_point(self),
            SymbolKind::GroupSeparator => visitor.visit_group_separator(self),
            SymbolKind::ParenthesisOpen | SymbolKind::ParenthesisClose => {
                visitor.visit_parenthesis(self)
            },
            SymbolKind::Separator => visitor.visit_separator(self),
            SymbolKind::Whitespace => visitor.visit_whitespace(self),
            SymbolKind::TextPlaceholder => visitor.visit_text_placeholder(self),
            SymbolKind::Plus
            | SymbolKind::Minus
            | SymbolKind::Multiply
            | SymbolKind::Divide
            | SymbolKind::Power
            | SymbolKind::Equals
            | SymbolKind::NotEquals
            | SymbolKind::LessThan
            | SymbolKind::LessThanEquals
            | SymbolKind::GreaterThan
            | SymbolKind::GreaterThanEquals => visitor.visit_operator(self),
        }
    }
}

/// Leaf carrying a scalar value. The text may be empty, the value is always
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "raw::RawValue")]
pub struct ValueToken {
    value: TokenValue,
    text: String,
}

impl ValueToken {
    /// Fails with `InvalidArgument` when a date/time component is out of
    /// range (month 13, minute 60, ...) or a number is not finite.
    pub fn new(value: TokenValue, text: impl Into<String>) -> Result<Self> {
        value.validate()?;
        Ok(Self {
            value,
            text: text.into(),
        })
    }

    #[inline]
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn accept<V: TokenVisitor + ?Sized>(&self, visitor: &mut V) {
        match &self.value {
            TokenValue::Year(v) => visitor.visit_year(self, *v),
            TokenValue::MonthNumber(v) => visitor.visit_month_number(self, *v),
            TokenValue::MonthName(v) => visitor.visit_month_name(self, *v),
            TokenValue::Day(v) => visitor.visit_day(self, *v),
            TokenValue::Hour(v) => visitor.visit_hour(self, *v),
            TokenValue::Minute(v) => visitor.visit_minute(self, *v),
            TokenValue::Second(v) => visitor.visit_second(self, *v),
            TokenValue::Millisecond(v) => visitor.visit_millisecond(self, *v),
            TokenValue::AmPm(v) => visitor.visit_am_pm(self, *v),
            TokenValue::Date(v) => visitor.visit_date(self, *v),
            TokenValue::Time(v) => visitor.visit_time(self, *v),
            TokenValue::DateTime(v) => visitor.visit_date_time(self, *v),
            TokenValue::Text(v) => visitor.visit_text(self, v),
            TokenValue::Number(v) => visitor.visit_number(self, *v),
            TokenValue::Label(v) => visitor.visit_label(self, v),
            TokenValue::CellReference(v) => visitor.visit_cell_reference(self, v),
        }
    }
}

/// Node owning an ordered sequence of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "raw::RawParent")]
pub struct ParentToken {
    kind: ParentKind,
    children: Vec<Token>,
    text: String,
}

impl ParentToken {
    /// Fails with `InvalidArgument` if the children's text, concatenated in
    /// order, differs from `text`.
    pub fn new(kind: ParentKind, children: Vec<Token>, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let rebuilt = concat_text(&children);
        if rebuilt != text {
            return Err(Error::invalid(format!(
                "{:?} text {:?} does not match children text {:?}",
                kind, text, rebuilt
            )));
        }
        Ok(Self {
            kind,
            children,
            text,
        })
    }

    /// Create a parent whose text is computed from its children.
    pub fn from_children(kind: ParentKind, children: Vec<Token>) -> Self {
        let text = concat_text(&children);
        Self {
            kind,
            children,
            text,
        }
    }

    #[inline]
    pub fn kind(&self) -> ParentKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Token] {
        &self.children
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Same kind with different children; the text follows the children.
    pub fn with_children(&self, children: Vec<Token>) -> Self {
        Self::from_children(self.kind, children)
    }

    /// Same token with the child at `index` replaced.
    pub fn replace_child(&self, index: usize, child: Token) -> Result<Self> {
        if index >= self.children.len() {
            return Err(Error::invalid(format!(
                "child index {} out of bounds for {} children",
                index,
                self.children.len()
            )));
        }
        let mut children = self.children.clone();
        children[index] = child;
        Ok(self.with_children(children))
    }

    pub fn accept<V: TokenVisitor + ?Sized>(&self, visitor: &mut V) {
        let visiting = match self.kind {
            ParentKind::Date => visitor.start_visit_date(self),
            ParentKind::Time => visitor.start_visit_time(self),
            ParentKind::DateTime => visitor.start_visit_date_time(self),
            ParentKind::TextPattern => visitor.start_visit_text_pattern(self),
            ParentKind::Range => visitor.start_visit_range(self),
            ParentKind::Group => visitor.start_visit_group(self),
            ParentKind::Expression => visitor.start_visit_expression(self),
        };

        if visiting == Visiting::Continue {
            for child in &self.children {
                child.accept(visitor);
            }
        }

        match self.kind {
            ParentKind::Date => visitor.end_visit_date(self),
            ParentKind::Time => visitor.end_visit_time(self),
            ParentKind::DateTime => visitor.end_visit_date_time(self),
            ParentKind::TextPattern => visitor.end_visit_text_pattern(self),
            ParentKind::Range => visitor.end_visit_range(self),
            ParentKind::Group => visitor.end_visit_group(self),
            ParentKind::Expression => visitor.end_visit_expression(self),
        }
    }
}

fn concat_text(children: &[Token]) -> String {
    let len = children.iter().map(|c| c.text().len()).sum();
    let mut text = String::with_capacity(len);
    for child in children {
        text.push_str(child.text());
    }
    text
}

/// Unvalidated serde shapes; deserialization goes through the constructors.
mod raw {
    use super::*;

    #[derive(Deserialize)]
    pub(super) struct RawSymbol {
        kind: SymbolKind,
        text: String,
    }

    impl TryFrom<RawSymbol> for SymbolToken {
        type Error = Error;

        fn try_from(raw: RawSymbol) -> Result<Self> {
            SymbolToken::new(raw.kind, raw.text)
        }
    }

    #[derive(Deserialize)]
    pub(super) struct RawValue {
        value: TokenValue,
        text: String,
    }

    impl TryFrom<RawValue> for ValueToken {
        type Error = Error;

        fn try_from(raw: RawValue) -> Result<Self> {
            ValueToken::new(raw.value, raw.text)
        }
    }

    #[derive(Deserialize)]
    pub(super) struct RawParent {
        kind: ParentKind,
        children: Vec<Token>,
        text: String,
    }

    impl TryFrom<RawParent> for ParentToken {
        type Error = Error;

        fn try_from(raw: RawParent) -> Result<Self> {
            ParentToken::new(raw.kind, raw.children, raw.text)
        }
    }
}
