//! CSS tokens with decoded values
//!
//! [`tokenize`] runs the raw scanner from [`crate::lexer`] and decodes each
//! lexeme: escapes in ident-like tokens and strings, numeric values, units
//! and hash types. Every token keeps its exact source slice.

use crate::lexer::{lex, RawToken, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a numeric literal was written as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Integer,
    Number,
}

/// Whether a hash token would also be a valid ID selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    Id,
    Unrestricted,
}

/// Token kinds with their decoded payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tokenType")]
pub enum TokenKind {
    Whitespace,
    Ident { value: String },
    Function { name: String },
    AtKeyword { value: String },
    Hash { value: String, kind: HashKind },
    String { value: String },
    Url { value: String },
    Delim { value: char },
    Number { value: f64, kind: NumericKind },
    Percentage { value: f64 },
    Dimension { value: f64, kind: NumericKind, unit: String },
    Cdo,
    Cdc,
    Colon,
    Semicolon,
    Comma,
    OpenSquare,
    CloseSquare,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
}

impl TokenKind {
    /// Stable tag used in diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Ident { .. } => "IDENT",
            TokenKind::Function { .. } => "FUNCTION",
            TokenKind::AtKeyword { .. } => "AT-KEYWORD",
            TokenKind::Hash { .. } => "HASH",
            TokenKind::String { .. } => "STRING",
            TokenKind::Url { .. } => "URL",
            TokenKind::Delim { .. } => "DELIM",
            TokenKind::Number { .. } => "NUMBER",
            TokenKind::Percentage { .. } => "PERCENTAGE",
            TokenKind::Dimension { .. } => "DIMENSION",
            TokenKind::Cdo => "CDO",
            TokenKind::Cdc => "CDC",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::OpenSquare => "[",
            TokenKind::CloseSquare => "]",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A decoded token with its exact source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub source: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, source: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            source: source.into(),
            span,
        }
    }

    pub fn to_source(&self) -> &str {
        &self.source
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }

    pub fn is_comma(&self) -> bool {
        matches!(self.kind, TokenKind::Comma)
    }

    pub fn is_delim(&self, c: char) -> bool {
        matches!(self.kind, TokenKind::Delim { value } if value == c)
    }

    /// ASCII case-insensitive identifier match
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident { value } if value.eq_ignore_ascii_case(name))
    }
}

/// Tokenize CSS source text. Never fails: unrecognized code points become delims.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for result in lex(source) {
        match result {
            Ok(spanned) => tokens.push(Token::new(
                cook(spanned.token, spanned.slice),
                spanned.slice,
                spanned.span,
            )),
            Err(err) => {
                for (offset, c) in err.slice.char_indices() {
                    let start = err.span.start + offset;
                    tokens.push(Token::new(
                        TokenKind::Delim { value: c },
                        c.to_string(),
                        Span::new(start, start + c.len_utf8()),
                    ));
                }
            }
        }
    }

    tokens
}

fn cook(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Whitespace => TokenKind::Whitespace,
        RawToken::Ident => TokenKind::Ident {
            value: unescape(slice),
        },
        RawToken::Function => TokenKind::Function {
            name: unescape(&slice[..slice.len() - 1]),
        },
        RawToken::AtKeyword => TokenKind::AtKeyword {
            value: unescape(&slice[1..]),
        },
        RawToken::Hash => {
            let rest = &slice[1..];
            let kind = if starts_identifier(rest) {
                HashKind::Id
            } else {
                HashKind::Unrestricted
            };
            TokenKind::Hash {
                value: unescape(rest),
                kind,
            }
        }
        RawToken::String => TokenKind::String {
            value: unescape(&slice[1..slice.len() - 1]),
        },
        RawToken::Url => {
            // Strip `url(` and `)`, then the optional padding inside
            let inner = &slice[4..slice.len() - 1];
            TokenKind::Url {
                value: unescape(inner.trim_matches(is_css_whitespace)),
            }
        }
        RawToken::Number => {
            let (value, kind, _) = read_number(slice);
            TokenKind::Number { value, kind }
        }
        RawToken::Percentage => {
            let (value, _, _) = read_number(slice);
            TokenKind::Percentage { value }
        }
        RawToken::Dimension => {
            let (value, kind, end) = read_number(slice);
            TokenKind::Dimension {
                value,
                kind,
                unit: unescape(&slice[end..]),
            }
        }
        RawToken::Cdo => TokenKind::Cdo,
        RawToken::Cdc => TokenKind::Cdc,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LBracket => TokenKind::OpenSquare,
        RawToken::RBracket => TokenKind::CloseSquare,
        RawToken::LParen => TokenKind::OpenParen,
        RawToken::RParen => TokenKind::CloseParen,
        RawToken::LBrace => TokenKind::OpenCurly,
        RawToken::RBrace => TokenKind::CloseCurly,
        RawToken::Delim => TokenKind::Delim {
            value: slice.chars().next().unwrap_or('\u{FFFD}'),
        },
    }
}

fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && !matches!(second, None | Some('\n' | '\r' | '\u{000C}'))
}

/// Would the text start an identifier? Used to classify hash tokens.
fn starts_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let first = chars.next();
    let second = chars.next();
    let third = chars.next();

    match first {
        Some('-') => {
            matches!(second, Some(c) if is_name_start(c) || c == '-')
                || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_name_start(c),
        None => false,
    }
}

/// Read the longest numeric prefix. Returns the value, its kind and the byte length read.
fn read_number(text: &str) -> (f64, NumericKind, usize) {
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut kind = NumericKind::Integer;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        kind = NumericKind::Number;
        end += 2;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let digits_at = if matches!(bytes.get(end + 1), Some(b'+' | b'-')) {
            end + 2
        } else {
            end + 1
        };
        if bytes.get(digits_at).is_some_and(u8::is_ascii_digit) {
            kind = NumericKind::Number;
            end = digits_at;
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
        }
    }

    let value = text[..end].parse().unwrap_or(0.0);
    (value, kind, end)
}

/// Decode CSS escapes. Escaped newlines (string continuations) are dropped.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            None => out.push('\u{FFFD}'),
            Some('\n' | '\u{000C}') => {
                chars.next();
            }
            Some('\r') => {
                chars.next();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(h) if h.is_ascii_hexdigit() => {
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 6 {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            digits += 1;
                            chars.next();
                        }
                        None => break,
                    }
                }
                match chars.peek().copied() {
                    Some('\r') => {
                        chars.next();
                        if chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                    }
                    Some(w) if is_css_whitespace(w) => {
                        chars.next();
                    }
                    _ => {}
                }
                let decoded = if code == 0 {
                    '\u{FFFD}'
                } else {
                    char::from_u32(code).unwrap_or('\u{FFFD}')
                };
                out.push(decoded);
            }
            Some(other) => {
                chars.next();
                out.push(other);
            }
        }
    }

    out
}
