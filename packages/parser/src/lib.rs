//! Typed stylesheet AST on top of the generic CSS parse tree
//!
//! `cascada-syntax` turns source text into rules, blocks and preserved tokens.
//! This crate walks that tree and produces a [`StyleSheet`] of style rules,
//! at-rules, declarations and typed component values. Functions can be
//! registered to have their arguments split on commas.

pub mod ast;
pub mod error;
pub mod grammar;
pub mod helpers;
pub mod options;
pub mod parser;
pub mod printer;
pub mod registry;

pub use ast::{
    AtRule, ComponentValue, Declaration, Rule, StylePropertyDeclaration, StyleRule, StyleSheet,
};
#[cfg(feature = "pretty-errors")]
pub use error::format_error;
pub use error::{BuildError, BuildResult, OptionsError};
pub use grammar::{CssGrammar, DeclarationGrammar};
pub use options::ParserOptions;
pub use parser::{parse, Parser};
pub use printer::{print_nodes, print_value};
pub use registry::{ArgumentPolicy, FunctionRegistry};
