//! CSS Syntax Level 3 consumption algorithms
//!
//! The functions here turn a stream of tokens (or already consumed component
//! values) into the generic tree from [`crate::tree`]. Parse errors follow the
//! CSS error recovery rules: the offending input is skipped, never reported.

use crate::lexer::Span;
use crate::tokenizer::{tokenize, Token, TokenKind};
use crate::tree::{AtRule, BlockKind, Declaration, Function, Node, QualifiedRule, SimpleBlock, Stylesheet};
use std::iter::Peekable;
use std::vec::IntoIter;
use tracing::{instrument, trace};

/// Cursor over component values
///
/// The stream may hold raw tokens or nodes that were consumed earlier (blocks,
/// functions). Consumed nodes are passed through as-is, which is what lets a
/// block's contents be re-read as a list of declarations.
pub struct TokenStream {
    nodes: Peekable<IntoIter<Node>>,
    depth: usize,
}

/// Deepest block or function nesting the consume algorithms will build.
/// Openers past this depth are kept as plain tokens.
pub const MAX_NESTING_DEPTH: usize = 128;

impl TokenStream {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into_iter().peekable(),
            depth: 0,
        }
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::new(tokens.into_iter().map(Node::from).collect())
    }

    pub fn peek(&mut self) -> Option<&Node> {
        self.nodes.peek()
    }

    pub fn consume(&mut self) -> Option<Node> {
        self.nodes.next()
    }

    fn peek_kind(&mut self) -> Option<&TokenKind> {
        self.nodes.peek().and_then(Node::token_kind)
    }

    fn next_is(&mut self, pred: impl FnOnce(&TokenKind) -> bool) -> bool {
        self.peek_kind().is_some_and(pred)
    }

    fn at_end(&mut self) -> bool {
        self.nodes.peek().is_none()
    }
}

impl From<Vec<Node>> for TokenStream {
    fn from(nodes: Vec<Node>) -> Self {
        Self::new(nodes)
    }
}

/// Parse a complete stylesheet
#[instrument(skip_all, fields(len = source.len()))]
pub fn parse_stylesheet(source: &str) -> Stylesheet {
    let mut stream = TokenStream::from_tokens(tokenize(source));
    Stylesheet {
        value: consume_list_of_rules(&mut stream, true),
    }
}

/// Parse the contents of a declaration block (no surrounding braces)
pub fn parse_list_of_declarations(source: &str) -> Vec<Node> {
    consume_list_of_declarations(&mut TokenStream::from_tokens(tokenize(source)))
}

/// Parse source text into a flat list of component values
pub fn parse_component_values(source: &str) -> Vec<Node> {
    let mut stream = TokenStream::from_tokens(tokenize(source));
    let mut values = Vec::new();
    while !stream.at_end() {
        if let Some(value) = consume_component_value(&mut stream) {
            values.push(value);
        }
    }
    values
}

/// Consume a list of rules. At the top level `<!--` and `-->` are ignored.
pub fn consume_list_of_rules(stream: &mut TokenStream, top_level: bool) -> Vec<Node> {
    let mut rules = Vec::new();

    loop {
        let Some(node) = stream.peek() else {
            break;
        };

        match node.token_kind() {
            Some(TokenKind::Whitespace) => {
                stream.consume();
            }
            Some(TokenKind::Cdo | TokenKind::Cdc) if top_level => {
                stream.consume();
            }
            Some(TokenKind::AtKeyword { .. }) => {
                rules.push(Node::AtRule(consume_at_rule(stream)));
            }
            _ => {
                if let Some(rule) = consume_qualified_rule(stream) {
                    rules.push(Node::QualifiedRule(rule));
                }
            }
        }
    }

    rules
}

/// Consume an at-rule. The next node must be an at-keyword token.
pub fn consume_at_rule(stream: &mut TokenStream) -> AtRule {
    let (name, mut span) = match stream.consume() {
        Some(Node::Token(Token {
            kind: TokenKind::AtKeyword { value },
            span,
            ..
        })) => (value, span),
        other => {
            trace!(found = ?other.as_ref().map(Node::kind), "at-rule without at-keyword");
            let span = other.map(|node| node.span()).unwrap_or_default();
            (String::new(), span)
        }
    };

    let mut prelude = Vec::new();
    let mut value = None;

    loop {
        match stream.peek() {
            None => {
                trace!(name = %name, "at-rule ended by end of input");
                break;
            }
            Some(Node::Token(token)) if matches!(token.kind, TokenKind::Semicolon) => {
                span = span.to(token.span);
                stream.consume();
                break;
            }
            Some(Node::Token(token)) if matches!(token.kind, TokenKind::OpenCurly) => {
                if let Some(Node::Token(open)) = stream.consume() {
                    let block = consume_simple_block(stream, open, BlockKind::Curly);
                    span = span.to(block.span);
                    value = Some(block);
                }
                break;
            }
            Some(Node::Block(block)) if block.associated == BlockKind::Curly => {
                if let Some(Node::Block(block)) = stream.consume() {
                    span = span.to(block.span);
                    value = Some(block);
                }
                break;
            }
            Some(_) => {
                if let Some(node) = consume_component_value(stream) {
                    span = span.to(node.span());
                    prelude.push(node);
                }
            }
        }
    }

    AtRule {
        name,
        prelude,
        value,
        span,
    }
}

/// Consume a qualified rule. Returns `None` when input ends before the block.
pub fn consume_qualified_rule(stream: &mut TokenStream) -> Option<QualifiedRule> {
    let mut prelude: Vec<Node> = Vec::new();

    loop {
        match stream.peek() {
            None => {
                trace!(prelude = prelude.len(), "qualified rule dropped at end of input");
                return None;
            }
            Some(Node::Token(token)) if matches!(token.kind, TokenKind::OpenCurly) => {
                let Some(Node::Token(open)) = stream.consume() else {
                    return None;
                };
                let block = consume_simple_block(stream, open, BlockKind::Curly);
                return Some(finish_qualified_rule(prelude, block));
            }
            Some(Node::Block(block)) if block.associated == BlockKind::Curly => {
                let Some(Node::Block(block)) = stream.consume() else {
                    return None;
                };
                return Some(finish_qualified_rule(prelude, block));
            }
            Some(_) => {
                if let Some(node) = consume_component_value(stream) {
                    prelude.push(node);
                }
            }
        }
    }
}

fn finish_qualified_rule(prelude: Vec<Node>, block: SimpleBlock) -> QualifiedRule {
    let span = prelude
        .first()
        .map(|node| node.span().to(block.span))
        .unwrap_or(block.span);
    QualifiedRule {
        prelude,
        value: block,
        span,
    }
}

/// Consume a list of declarations, as found inside a style rule's block
pub fn consume_list_of_declarations(stream: &mut TokenStream) -> Vec<Node> {
    let mut decls = Vec::new();

    loop {
        let Some(node) = stream.peek() else {
            break;
        };

        match node.token_kind() {
            Some(TokenKind::Whitespace | TokenKind::Semicolon) => {
                stream.consume();
            }
            Some(TokenKind::AtKeyword { .. }) => {
                decls.push(Node::AtRule(consume_at_rule(stream)));
            }
            Some(TokenKind::Ident { .. }) => {
                let mut temp = Vec::new();
                if let Some(first) = stream.consume() {
                    temp.push(first);
                }
                while !stream.at_end() && !stream.next_is(|k| matches!(k, TokenKind::Semicolon)) {
                    if let Some(value) = consume_component_value(stream) {
                        temp.push(value);
                    }
                }
                if let Some(decl) = consume_declaration(&mut TokenStream::new(temp)) {
                    decls.push(Node::Declaration(decl));
                }
            }
            _ => {
                trace!(kind = %node.kind(), "skipping invalid declaration");
                while !stream.at_end() && !stream.next_is(|k| matches!(k, TokenKind::Semicolon)) {
                    consume_component_value(stream);
                }
            }
        }
    }

    decls
}

/// Consume a declaration. The next node must be an ident token.
pub fn consume_declaration(stream: &mut TokenStream) -> Option<Declaration> {
    let (name, start) = match stream.consume() {
        Some(Node::Token(Token {
            kind: TokenKind::Ident { value },
            span,
            ..
        })) => (value, span),
        _ => return None,
    };

    while stream.next_is(|k| matches!(k, TokenKind::Whitespace)) {
        stream.consume();
    }

    if !stream.next_is(|k| matches!(k, TokenKind::Colon)) {
        trace!(name = %name, "declaration without colon");
        return None;
    }
    let colon = stream.consume().map(|node| node.span()).unwrap_or(start);

    let mut value = Vec::new();
    while !stream.at_end() {
        if let Some(node) = consume_component_value(stream) {
            value.push(node);
        }
    }

    let span = value
        .last()
        .map(|node| start.to(node.span()))
        .unwrap_or_else(|| start.to(colon));
    let important = strip_important(&mut value);

    Some(Declaration {
        name,
        value,
        important,
        span,
    })
}

/// Remove a trailing `! important` from a declaration value
fn strip_important(value: &mut Vec<Node>) -> bool {
    let mut found_important = false;

    for i in (0..value.len()).rev() {
        let Some(token) = value[i].token() else {
            return false;
        };
        if token.is_whitespace() {
            continue;
        } else if !found_important && token.is_ident("important") {
            found_important = true;
        } else if found_important && token.is_delim('!') {
            value.truncate(i);
            return true;
        } else {
            return false;
        }
    }

    false
}

/// Consume one component value: a preserved token, a simple block or a function
pub fn consume_component_value(stream: &mut TokenStream) -> Option<Node> {
    match stream.consume()? {
        Node::Token(token) if stream.depth >= MAX_NESTING_DEPTH => {
            trace!(kind = %token.kind, "nesting limit reached, keeping token flat");
            Some(Node::Token(token))
        }
        Node::Token(token) => {
            if let Some(kind) = BlockKind::from_open(&token.kind) {
                return Some(Node::Block(consume_simple_block(stream, token, kind)));
            }
            if let TokenKind::Function { name } = &token.kind {
                let name = name.clone();
                return Some(Node::Function(consume_function(stream, token, name)));
            }
            Some(Node::Token(token))
        }
        node => Some(node),
    }
}

/// Consume the contents of a block up to its matching close token
pub fn consume_simple_block(stream: &mut TokenStream, open: Token, associated: BlockKind) -> SimpleBlock {
    let mut value = Vec::new();
    let mut span = open.span;
    stream.depth += 1;

    loop {
        if stream.next_is(|k| associated.closes(k)) {
            if let Some(close) = stream.consume() {
                span = span.to(close.span());
            }
            break;
        }
        match consume_component_value(stream) {
            Some(node) => {
                span = span.to(node.span());
                value.push(node);
            }
            None => {
                trace!(block = ?associated, "block ended by end of input");
                break;
            }
        }
    }

    stream.depth -= 1;

    SimpleBlock {
        associated,
        value,
        span,
    }
}

/// Consume the arguments of a function up to its `)`
pub fn consume_function(stream: &mut TokenStream, token: Token, name: String) -> Function {
    let raw_name = token
        .source
        .strip_suffix('(')
        .unwrap_or(&token.source)
        .to_string();
    let mut value = Vec::new();
    let mut span: Span = token.span;
    stream.depth += 1;

    loop {
        if stream.next_is(|k| matches!(k, TokenKind::CloseParen)) {
            if let Some(close) = stream.consume() {
                span = span.to(close.span());
            }
            break;
        }
        match consume_component_value(stream) {
            Some(node) => {
                span = span.to(node.span());
                value.push(node);
            }
            None => {
                trace!(function = %name, "function ended by end of input");
                break;
            }
        }
    }

    stream.depth -= 1;

    Function {
        name,
        raw_name,
        value,
        span,
    }
}
