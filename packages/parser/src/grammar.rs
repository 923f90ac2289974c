//! Re-entry point into the CSS grammar
//!
//! Building a rule body does not walk an existing sub-tree: the block's raw
//! contents are handed back to the grammar to be consumed as a list of
//! declarations. The trait keeps that call behind a seam so the builder holds
//! no tokenization rules of its own.

use cascada_syntax::{consume_list_of_declarations, Node};

pub trait DeclarationGrammar {
    /// Consume `values` as a list of declarations, yielding declaration and at-rule nodes
    fn consume_declarations(&self, values: &[Node]) -> Vec<Node>;
}

/// The CSS Syntax Level 3 grammar from `cascada-syntax`
#[derive(Debug, Clone, Copy, Default)]
pub struct CssGrammar;

impl DeclarationGrammar for CssGrammar {
    fn consume_declarations(&self, values: &[Node]) -> Vec<Node> {
        consume_list_of_declarations(&mut values.to_vec().into())
    }
}
