use cascada_syntax::{Node, SimpleBlock};
use serde::{Deserialize, Serialize};

/// Root stylesheet node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct StyleSheet {
    pub rules: Vec<Rule>,
}

/// Top-level rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Rule {
    StyleRule(StyleRule),
    AtRule(AtRule),
}

/// Selector plus declaration block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    /// One combined selector text per rule
    pub selectors: Vec<String>,
    pub body: Vec<Declaration>,
}

/// At-rule with its prelude and block kept as parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRule {
    pub name: String,
    pub prelude: Vec<Node>,
    pub value: Option<SimpleBlock>,
}

/// Entry in a rule body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Declaration {
    StylePropertyDeclaration(StylePropertyDeclaration),
    AtRule(AtRule),
}

/// `name: values` with the `!important` flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePropertyDeclaration {
    pub important: bool,
    pub name: String,
    pub values: Vec<ComponentValue>,
}

/// One element of a declaration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentValue {
    /// Whitespace, delimiters and commas
    Token { source: String },

    Ident { name: String, source: String },

    Hash { value: String, source: String },

    String { value: String, source: String },

    Number { value: f64, source: String },

    Dimension {
        value: f64,
        unit: String,
        source: String,
    },

    Percentage { value: f64, source: String },

    /// Function call, possibly nested. `source` is the name as written.
    Function {
        name: String,
        args: Vec<ComponentValue>,
        source: String,
    },
}

impl ComponentValue {
    pub fn token(source: impl Into<String>) -> Self {
        ComponentValue::Token {
            source: source.into(),
        }
    }

    /// A single space token
    pub fn ws() -> Self {
        Self::token(" ")
    }

    pub fn comma() -> Self {
        Self::token(",")
    }

    pub fn ident(name: impl Into<String>) -> Self {
        let name = name.into();
        ComponentValue::Ident {
            source: name.clone(),
            name,
        }
    }

    /// A number whose source is the shortest rendering of `value`
    pub fn number(value: f64) -> Self {
        ComponentValue::Number {
            value,
            source: value.to_string(),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<ComponentValue>) -> Self {
        let name = name.into();
        ComponentValue::Function {
            source: name.clone(),
            name,
            args,
        }
    }

    /// The retained source text. For a function this is only its name.
    pub fn source(&self) -> &str {
        match self {
            ComponentValue::Token { source }
            | ComponentValue::Ident { source, .. }
            | ComponentValue::Hash { source, .. }
            | ComponentValue::String { source, .. }
            | ComponentValue::Number { source, .. }
            | ComponentValue::Dimension { source, .. }
            | ComponentValue::Percentage { source, .. }
            | ComponentValue::Function { source, .. } => source,
        }
    }
}

impl StyleSheet {
    pub fn style_rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::StyleRule(style_rule) => Some(style_rule),
            Rule::AtRule(_) => None,
        })
    }
}

impl StyleRule {
    pub fn properties(&self) -> impl Iterator<Item = &StylePropertyDeclaration> {
        self.body.iter().filter_map(|decl| match decl {
            Declaration::StylePropertyDeclaration(property) => Some(property),
            Declaration::AtRule(_) => None,
        })
    }
}
