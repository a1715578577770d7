//! Text format patterns.
//!
//! A text pattern decides how a text cell is displayed: `@` stands for the
//! cell's own text, `"quoted"` runs and `\c` escapes are printed literally,
//! and so is any other character. `"Total: "@` renders `42` as `Total: 42`.

use crate::common::{Error, Result};
use crate::token::{ParentKind, SymbolKind, Token, TokenValue};

/// Parse a text format pattern into a `TextPattern` parent token.
pub fn parse_text_pattern(pattern: &str) -> Result<Token> {
    if pattern.is_empty() {
        return Err(Error::null("text pattern"));
    }

    let mut children = Vec::new();
    let mut rest = pattern;
    let mut pos = 0;

    while let Some(ch) = rest.chars().next() {
        let len = match ch {
            '@' => {
                children.push(Token::symbol(SymbolKind::TextPlaceholder, "@")?);
                1
            },
            '"' => {
                // The closing quote ends the literal; there is no escaping
                // inside quotes.
                let close = rest[1..].find('"').ok_or_else(|| {
                    Error::invalid(format!("unterminated quote at {} in {:?}", pos, pattern))
                })?;
                let inner = &rest[1..1 + close];
                let text = &rest[..close + 2];
                children.push(Token::leaf(TokenValue::Text(inner.to_string()), text)?);
                text.len()
            },
            '\\' => {
                let escaped = rest[1..].chars().next().ok_or_else(|| {
                    Error::invalid(format!("dangling escape at {} in {:?}", pos, pattern))
                })?;
                let text = &rest[..1 + escaped.len_utf8()];
                children.push(Token::leaf(TokenValue::Text(escaped.to_string()), text)?);
                text.len()
            },
            c if c.is_whitespace() => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !c.is_whitespace())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                children.push(Token::symbol(SymbolKind::Whitespace, &rest[..len])?);
                len
            },
            _ => {
                // Plain characters up to the next special one form one literal.
                let len = rest
                    .char_indices()
                    .find(|(_, c)| matches!(c, '@' | '"' | '\\') || c.is_whitespace())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                let text = &rest[..len];
                children.push(Token::leaf(TokenValue::Text(text.to_string()), text)?);
                len
            },
        };
        rest = &rest[len..];
        pos += len;
    }

    log::trace!(
        "event=text_pattern_parse module=parser pattern={:?} tokens={}",
        pattern,
        children.len()
    );
    Token::parent(ParentKind::TextPattern, children, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenPayload;

    fn texts(token: &Token) -> Vec<&str> {
        token.children().iter().map(|t| t.text()).collect()
    }

    #[test]
    fn test_placeholder_and_literals() {
        let token = parse_text_pattern("\"Total: \"@ units").unwrap();
        assert_eq!(token.text(), "\"Total: \"@ units");
        assert_eq!(texts(&token), vec!["\"Total: \"", "@", " ", "units"]);
        assert_eq!(
            token.children()[0].value(),
            TokenPayload::Scalar(&TokenValue::Text("Total: ".to_string()))
        );
    }

    #[test]
    fn test_escapes_and_empty_literal() {
        let token = parse_text_pattern("\\@@\"\"").unwrap();
        assert_eq!(texts(&token), vec!["\\@", "@", "\"\""]);
        assert_eq!(
            token.children()[0].value(),
            TokenPayload::Scalar(&TokenValue::Text("@".to_string()))
        );
        assert_eq!(
            token.children()[2].value(),
            TokenPayload::Scalar(&TokenValue::Text(String::new()))
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_text_pattern(""), Err(Error::NullArgument(_))));
        assert!(matches!(parse_text_pattern("\"open"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_text_pattern("@\\"), Err(Error::InvalidArgument(_))));
    }
}
