use crate::ast::{
    AtRule, ComponentValue, Declaration, Rule, StylePropertyDeclaration, StyleRule, StyleSheet,
};
use crate::error::{BuildError, BuildResult};
use crate::grammar::{CssGrammar, DeclarationGrammar};
use crate::helpers::{strip_whitespace_and_commas, trim_whitespace};
use crate::options::ParserOptions;
use crate::registry::{ArgumentPolicy, FunctionRegistry};
use cascada_syntax::{self as syntax, nodes_to_source, Node, Token, TokenKind, MAX_NESTING_DEPTH};
use tracing::{debug, info, instrument};

/// Builds the typed stylesheet AST from the generic CSS parse tree
///
/// The only state is the function registry. It is read, never written, while
/// a tree is being built, so a shared `&Parser` can build from several
/// threads at once. Registration needs `&mut self`.
pub struct Parser<G = CssGrammar> {
    registry: FunctionRegistry,
    grammar: G,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self::with_grammar(options, CssGrammar)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl<G: DeclarationGrammar> Parser<G> {
    pub fn with_grammar(options: ParserOptions, grammar: G) -> Self {
        Self {
            registry: options.custom_functions.into_iter().collect(),
            grammar,
        }
    }

    /// Set the argument policy for a function name, replacing any earlier one
    pub fn register_function(&mut self, name: impl Into<String>, policy: impl Into<ArgumentPolicy>) {
        self.registry.register(name, policy);
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Parse stylesheet source text
    #[instrument(skip_all, fields(len = source.len()))]
    pub fn parse(&self, source: &str) -> BuildResult<StyleSheet> {
        info!("Starting stylesheet build");

        let tree = syntax::parse_stylesheet(source);
        let stylesheet = self.build_stylesheet(&tree)?;

        info!(rules = stylesheet.rules.len(), "Stylesheet build complete");
        Ok(stylesheet)
    }

    pub fn build_stylesheet(&self, tree: &syntax::Stylesheet) -> BuildResult<StyleSheet> {
        let rules = tree
            .value
            .iter()
            .map(|node| self.build_rule(node))
            .collect::<BuildResult<Vec<_>>>()?;

        Ok(StyleSheet { rules })
    }

    pub fn build_rule(&self, node: &Node) -> BuildResult<Rule> {
        match node {
            Node::QualifiedRule(rule) => Ok(Rule::StyleRule(self.build_style_rule(rule)?)),
            Node::AtRule(rule) => Ok(Rule::AtRule(self.build_at_rule(rule))),
            other => Err(BuildError::UnknownRuleKind {
                kind: other.kind(),
                span: other.span(),
            }),
        }
    }

    pub fn build_style_rule(&self, rule: &syntax::QualifiedRule) -> BuildResult<StyleRule> {
        let selector = self.build_selector(&rule.prelude);
        debug!(selector = %selector, "Building style rule");

        Ok(StyleRule {
            selectors: vec![selector],
            body: self.build_declarations(&rule.value.value)?,
        })
    }

    /// Concatenated prelude source with trailing whitespace removed. Leading
    /// whitespace is kept.
    pub fn build_selector(&self, prelude: &[Node]) -> String {
        nodes_to_source(prelude).trim_end().to_string()
    }

    /// Re-read a block's contents as a list of declarations and build each one
    pub fn build_declarations(&self, values: &[Node]) -> BuildResult<Vec<Declaration>> {
        self.grammar
            .consume_declarations(values)
            .iter()
            .map(|node| self.build_declaration(node))
            .collect()
    }

    pub fn build_declaration(&self, node: &Node) -> BuildResult<Declaration> {
        match node {
            Node::Declaration(decl) => Ok(Declaration::StylePropertyDeclaration(
                self.build_style_property_declaration(decl)?,
            )),
            Node::AtRule(rule) => Ok(Declaration::AtRule(self.build_at_rule(rule))),
            other => Err(BuildError::UnknownDeclarationKind {
                kind: other.kind(),
                span: other.span(),
            }),
        }
    }

    pub fn build_style_property_declaration(
        &self,
        decl: &syntax::Declaration,
    ) -> BuildResult<StylePropertyDeclaration> {
        debug!(name = %decl.name, important = decl.important, "Building declaration");

        Ok(StylePropertyDeclaration {
            important: decl.important,
            name: decl.name.clone(),
            values: self.build_component_values(&decl.value)?,
        })
    }

    /// Build a value list with surrounding whitespace trimmed
    pub fn build_component_values(&self, values: &[Node]) -> BuildResult<Vec<ComponentValue>> {
        trim_whitespace(values)?
            .iter()
            .map(|node| self.build_component_value(node))
            .collect()
    }

    pub fn build_component_value(&self, node: &Node) -> BuildResult<ComponentValue> {
        let built = match node {
            Node::Token(token) if is_unnested_opener(&token.kind) => {
                return Err(BuildError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                    span: token.span,
                });
            }
            Node::Token(token) => build_token(token),
            Node::Function(function) => return self.build_function(function),
            _ => None,
        };

        built.ok_or_else(|| BuildError::UnknownComponentValue {
            token_kind: node.token_kind().map(TokenKind::tag).unwrap_or("none"),
            node_kind: node.kind(),
            snippet: node.to_source(),
            span: node.span(),
        })
    }

    pub fn build_function(&self, function: &syntax::Function) -> BuildResult<ComponentValue> {
        let args = match self.registry.lookup(&function.name) {
            Some(ArgumentPolicy::SplitOnCommas) => {
                debug!(function = %function.name, "Splitting function arguments on commas");
                self.build_comma_separated_values(&function.value)?
            }
            Some(ArgumentPolicy::Raw) | None => self.build_component_values(&function.value)?,
        };

        Ok(ComponentValue::Function {
            name: function.name.clone(),
            args,
            source: function.raw_name.clone(),
        })
    }

    /// One value per argument. Only correct for single-token or single-function
    /// arguments; longer arguments are flattened into the list.
    pub fn build_comma_separated_values(&self, values: &[Node]) -> BuildResult<Vec<ComponentValue>> {
        strip_whitespace_and_commas(values)
            .into_iter()
            .map(|node| self.build_component_value(node))
            .collect()
    }

    pub fn build_at_rule(&self, rule: &syntax::AtRule) -> AtRule {
        debug!(name = %rule.name, "Building at-rule");

        AtRule {
            name: rule.name.clone(),
            prelude: rule.prelude.clone(),
            value: rule.value.clone(),
        }
    }
}

/// Openers only stay flat tokens when the grammar stopped nesting at its depth limit
fn is_unnested_opener(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Function { .. }
            | TokenKind::OpenParen
            | TokenKind::OpenSquare
            | TokenKind::OpenCurly
    )
}

fn build_token(token: &Token) -> Option<ComponentValue> {
    let source = token.source.clone();

    let value = match &token.kind {
        TokenKind::Whitespace | TokenKind::Delim { .. } | TokenKind::Comma => {
            ComponentValue::Token { source }
        }
        TokenKind::Ident { value } => ComponentValue::Ident {
            name: value.clone(),
            source,
        },
        TokenKind::Hash { value, .. } => ComponentValue::Hash {
            value: value.clone(),
            source,
        },
        TokenKind::String { value } => ComponentValue::String {
            value: value.clone(),
            source,
        },
        TokenKind::Number { value, .. } => ComponentValue::Number {
            value: *value,
            source,
        },
        TokenKind::Dimension { value, unit, .. } => ComponentValue::Dimension {
            value: *value,
            unit: unit.clone(),
            source,
        },
        TokenKind::Percentage { value } => ComponentValue::Percentage {
            value: *value,
            source,
        },
        _ => return None,
    };

    Some(value)
}

/// Parse stylesheet source text with a parser built from `options`
pub fn parse(source: &str, options: ParserOptions) -> BuildResult<StyleSheet> {
    Parser::new(options).parse(source)
}
