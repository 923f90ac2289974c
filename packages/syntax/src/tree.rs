//! Generic CSS parse tree
//!
//! These are the shapes produced by the CSS Syntax "consume" algorithms:
//! rules, declarations, simple blocks, functions and preserved tokens. Nothing
//! here knows about selectors or property values.

use crate::lexer::Span;
use crate::tokenizer::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural kind of a generic node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Token,
    Function,
    Block,
    QualifiedRule,
    AtRule,
    Declaration,
}

impl NodeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Token => "TOKEN",
            NodeKind::Function => "FUNCTION",
            NodeKind::Block => "BLOCK",
            NodeKind::QualifiedRule => "QUALIFIED-RULE",
            NodeKind::AtRule => "AT-RULE",
            NodeKind::Declaration => "DECLARATION",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A node of the generic parse tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Token(Token),
    Function(Function),
    Block(SimpleBlock),
    QualifiedRule(QualifiedRule),
    AtRule(AtRule),
    Declaration(Declaration),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Token(_) => NodeKind::Token,
            Node::Function(_) => NodeKind::Function,
            Node::Block(_) => NodeKind::Block,
            Node::QualifiedRule(_) => NodeKind::QualifiedRule,
            Node::AtRule(_) => NodeKind::AtRule,
            Node::Declaration(_) => NodeKind::Declaration,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn token_kind(&self) -> Option<&TokenKind> {
        self.token().map(|token| &token.kind)
    }

    pub fn is_whitespace(&self) -> bool {
        self.token().is_some_and(Token::is_whitespace)
    }

    pub fn is_comma(&self) -> bool {
        self.token().is_some_and(Token::is_comma)
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Token(token) => token.span,
            Node::Function(function) => function.span,
            Node::Block(block) => block.span,
            Node::QualifiedRule(rule) => rule.span,
            Node::AtRule(rule) => rule.span,
            Node::Declaration(decl) => decl.span,
        }
    }

    /// Reconstruct the text of this node. Tokens give back their exact
    /// source; composite nodes are rebuilt from their parts.
    pub fn to_source(&self) -> String {
        match self {
            Node::Token(token) => token.source.clone(),
            Node::Function(function) => function.to_source(),
            Node::Block(block) => block.to_source(),
            Node::QualifiedRule(rule) => rule.to_source(),
            Node::AtRule(rule) => rule.to_source(),
            Node::Declaration(decl) => decl.to_source(),
        }
    }
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Token(token)
    }
}

/// Concatenate the source text of a node sequence
pub fn nodes_to_source(nodes: &[Node]) -> String {
    nodes.iter().map(Node::to_source).collect()
}

/// A function call: `name(` followed by component values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Name with escapes decoded
    pub name: String,
    /// Name as written in the source
    pub raw_name: String,
    pub value: Vec<Node>,
    pub span: Span,
}

impl Function {
    pub fn to_source(&self) -> String {
        format!("{}({})", self.raw_name, nodes_to_source(&self.value))
    }
}

/// Bracket pair that opened a simple block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Curly,
    Square,
    Paren,
}

impl BlockKind {
    pub fn open(&self) -> char {
        match self {
            BlockKind::Curly => '{',
            BlockKind::Square => '[',
            BlockKind::Paren => '(',
        }
    }

    pub fn close(&self) -> char {
        match self {
            BlockKind::Curly => '}',
            BlockKind::Square => ']',
            BlockKind::Paren => ')',
        }
    }

    pub fn from_open(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::OpenCurly => Some(BlockKind::Curly),
            TokenKind::OpenSquare => Some(BlockKind::Square),
            TokenKind::OpenParen => Some(BlockKind::Paren),
            _ => None,
        }
    }

    pub fn closes(&self, kind: &TokenKind) -> bool {
        matches!(
            (self, kind),
            (BlockKind::Curly, TokenKind::CloseCurly)
                | (BlockKind::Square, TokenKind::CloseSquare)
                | (BlockKind::Paren, TokenKind::CloseParen)
        )
    }
}

/// A `{}`, `[]` or `()` block and its contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleBlock {
    pub associated: BlockKind,
    pub value: Vec<Node>,
    pub span: Span,
}

impl SimpleBlock {
    pub fn to_source(&self) -> String {
        format!(
            "{}{}{}",
            self.associated.open(),
            nodes_to_source(&self.value),
            self.associated.close()
        )
    }
}

/// A prelude followed by a `{}` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedRule {
    pub prelude: Vec<Node>,
    pub value: SimpleBlock,
    pub span: Span,
}

impl QualifiedRule {
    pub fn to_source(&self) -> String {
        format!("{}{}", nodes_to_source(&self.prelude), self.value.to_source())
    }
}

/// `@name prelude;` or `@name prelude { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRule {
    pub name: String,
    pub prelude: Vec<Node>,
    pub value: Option<SimpleBlock>,
    pub span: Span,
}

impl AtRule {
    pub fn to_source(&self) -> String {
        let body = match &self.value {
            Some(block) => block.to_source(),
            None => ";".to_string(),
        };
        format!("@{}{}{}", self.name, nodes_to_source(&self.prelude), body)
    }
}

/// `name: value` with the `!important` flag already split off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub value: Vec<Node>,
    pub important: bool,
    pub span: Span,
}

impl Declaration {
    pub fn to_source(&self) -> String {
        let important = if self.important { "!important" } else { "" };
        format!("{}:{}{}", self.name, nodes_to_source(&self.value), important)
    }
}

/// The result of parsing a whole stylesheet: its top-level rules in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stylesheet {
    pub value: Vec<Node>,
}
