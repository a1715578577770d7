// Token kind definitions

use serde::{Deserialize, Serialize};

/// Symbol tokens: operators and pattern punctuation whose text is their
/// whole meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Percent,

    // Comparison
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,

    // Number pattern literals
    Currency,
    DecimalPoint,
    GroupSeparator,

    // Grouping
    ParenthesisOpen,
    ParenthesisClose,

    // Pattern punctuation
    Separator,
    Whitespace,
    TextPlaceholder,
}

impl SymbolKind {
    /// The only text a symbol of this kind may carry, if it is fixed.
    pub fn fixed_text(self) -> Option<&'static str> {
        match self {
            SymbolKind::Plus => Some("+"),
            SymbolKind::Minus => Some("-"),
            SymbolKind::Multiply => Some("*"),
            SymbolKind::Divide => Some("/"),
            SymbolKind::Power => Some("^"),
            SymbolKind::Percent => Some("%"),
            SymbolKind::Equals => Some("="),
            SymbolKind::NotEquals => Some("<>"),
            SymbolKind::LessThan => Some("<"),
            SymbolKind::LessThanEquals => Some("<="),
            SymbolKind::GreaterThan => Some(">"),
            SymbolKind::GreaterThanEquals => Some(">="),
            SymbolKind::ParenthesisOpen => Some("("),
            SymbolKind::ParenthesisClose => Some(")"),
            SymbolKind::TextPlaceholder => Some("@"),
            SymbolKind::Currency
            | SymbolKind::DecimalPoint
            | SymbolKind::GroupSeparator
            | SymbolKind::Separator
            | SymbolKind::Whitespace => None,
        }
    }

    /// Arithmetic and comparison operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
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
                | SymbolKind::GreaterThanEquals
        )
    }
}

/// Parent tokens, each owning an ordered sequence of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentKind {
    /// Date built from year/month/day components and separators
    Date,
    /// Time built from hour/minute/second components and separators
    Time,
    /// Date followed by time
    DateTime,
    /// Text format pattern such as `"Total: "@`
    TextPattern,
    /// `begin:end` cell range
    Range,
    /// Parenthesised sub-expression
    Group,
    /// Any other composite (operator chains, number patterns)
    Expression,
}
