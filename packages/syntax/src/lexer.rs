//! Raw CSS scanner using logos
//!
//! Logos gives us the longest-match DFA for the CSS Syntax Level 3 token
//! shapes. The scanner only classifies; decoding of escapes, numeric values
//! and units happens in [`crate::tokenizer`].

use logos::Logos;
use serde::{Deserialize, Serialize};

/// Token shapes recognized by the raw scanner
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")] // Comments never reach the tree
pub enum RawToken {
    #[regex(r"[ \t\n\r\f]+")]
    Whitespace,

    #[regex(r#"--(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*|-?(?:[a-zA-Z_]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*"#)]
    Ident,

    #[regex(r#"(?:--(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*|-?(?:[a-zA-Z_]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*)\("#)]
    Function,

    #[regex(r#"@(?:--(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*|-?(?:[a-zA-Z_]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*)"#)]
    AtKeyword,

    #[regex(r#"#(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))+"#)]
    Hash,

    #[regex(r#""(?:[^"\\\n\r\f]|\\[^\r]|\\\r\n?)*""#)]
    #[regex(r#"'(?:[^'\\\n\r\f]|\\[^\r]|\\\r\n?)*'"#)]
    String,

    #[regex(r#"[uU][rR][lL]\([ \t\n\r\f]*(?:[^"'()\\ \t\n\r\f\x00-\x08\x0B\x0E-\x1F\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*[ \t\n\r\f]*\)"#)]
    Url,

    // `1e3` is also a valid dimension shape; the number reading wins
    #[regex(r"[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?", priority = 5)]
    Number,

    #[regex(r"[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?%")]
    Percentage,

    #[regex(r#"[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?(?:--(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*|-?(?:[a-zA-Z_]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))(?:[a-zA-Z0-9_-]|[^\x00-\x7F]|\\(?:[^\n\r\f0-9a-fA-F]|[0-9a-fA-F]{1,6}[ \t\n\r\f]?))*)"#)]
    Dimension,

    #[token("<!--")]
    Cdo,
    #[token("-->")]
    Cdc,

    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Single code points that start nothing longer
    #[regex(r##"[!"#$%&'*+\-./<=>?@\\^`|~]"##)]
    Delim,
}

/// Byte range of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A raw token with its span and source slice
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'src> {
    pub token: RawToken,
    pub slice: &'src str,
    pub span: Span,
}

/// Input the scanner could not classify
#[derive(Debug, Clone, PartialEq)]
pub struct LexError<'src> {
    pub slice: &'src str,
    pub span: Span,
}

/// Lex source text into raw tokens with spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken<'_>, LexError<'_>>> + '_ {
    RawToken::lexer(source)
        .spanned()
        .map(move |(result, span)| match result {
            Ok(token) => Ok(SpannedToken {
                token,
                slice: &source[span.clone()],
                span: span.into(),
            }),
            Err(_) => Err(LexError {
                slice: &source[span.clone()],
                span: span.into(),
            }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<RawToken> {
        lex(source).filter_map(|r| r.ok()).map(|t| t.token).collect()
    }

    #[test]
    fn test_lex_identifiers_and_functions() {
        assert_eq!(
            kinds("red rgba( --alpha -moz-box"),
            vec![
                RawToken::Ident,
                RawToken::Whitespace,
                RawToken::Function,
                RawToken::Whitespace,
                RawToken::Ident,
                RawToken::Whitespace,
                RawToken::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_numerics() {
        assert_eq!(
            kinds("16px 50% 1.5 -3 1e3"),
            vec![
                RawToken::Dimension,
                RawToken::Whitespace,
                RawToken::Percentage,
                RawToken::Whitespace,
                RawToken::Number,
                RawToken::Whitespace,
                RawToken::Number,
                RawToken::Whitespace,
                RawToken::Number,
            ]
        );
    }

    #[test]
    fn test_lex_hash_and_at_keyword() {
        assert_eq!(
            kinds("#fff @media"),
            vec![RawToken::Hash, RawToken::Whitespace, RawToken::AtKeyword]
        );
    }

    #[test]
    fn test_lex_delims() {
        assert_eq!(
            kinds("- . ! /"),
            vec![
                RawToken::Delim,
                RawToken::Whitespace,
                RawToken::Delim,
                RawToken::Whitespace,
                RawToken::Delim,
                RawToken::Whitespace,
                RawToken::Delim,
            ]
        );
    }

    #[test]
    fn test_lex_quote_and_hash_delims() {
        let tokens: Vec<_> = lex("\" # $ ~").filter_map(|r| r.ok()).collect();
        let delims: Vec<_> = tokens
            .iter()
            .filter(|t| t.token == RawToken::Delim)
            .map(|t| t.slice)
            .collect();

        assert_eq!(delims, vec!["\"", "#", "$", "~"]);
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(kinds("a/* note */b"), vec![RawToken::Ident, RawToken::Ident]);
    }

    #[test]
    fn test_cdo_cdc_and_url() {
        assert_eq!(
            kinds("<!-- url(a.png) -->"),
            vec![
                RawToken::Cdo,
                RawToken::Whitespace,
                RawToken::Url,
                RawToken::Whitespace,
                RawToken::Cdc,
            ]
        );
    }

    #[test]
    fn test_spans_cover_slices() {
        let tokens: Vec<_> = lex("a {}").filter_map(|r| r.ok()).collect();
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[2].slice, "{");
        assert_eq!(tokens[3].span, Span::new(3, 4));
    }
}
