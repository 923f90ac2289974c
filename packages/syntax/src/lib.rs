//! CSS tokenizer and generic parse tree
//!
//! This crate implements the tokenization and "consume" algorithms of CSS
//! Syntax Level 3. Its output is a loosely structured tree of rules,
//! declarations, blocks, functions and preserved tokens. Typed ASTs are built
//! on top of it by `cascada-parser`.

pub mod grammar;
pub mod lexer;
pub mod tokenizer;
pub mod tree;

pub use grammar::{
    consume_list_of_declarations, consume_list_of_rules, parse_component_values,
    parse_list_of_declarations, parse_stylesheet, TokenStream, MAX_NESTING_DEPTH,
};
pub use lexer::Span;
pub use tokenizer::{tokenize, HashKind, NumericKind, Token, TokenKind};
pub use tree::{
    nodes_to_source, AtRule, BlockKind, Declaration, Function, Node, NodeKind, QualifiedRule,
    SimpleBlock, Stylesheet,
};
