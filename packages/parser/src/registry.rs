//! Function argument policies
//!
//! A policy decides how the arguments of a function call are built. Names are
//! matched exactly and case-sensitively against the function name as
//! tokenized. Registering a name again replaces its policy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a function's arguments are turned into component values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "PolicyRepr")]
pub enum ArgumentPolicy {
    /// Keep every token, including whitespace and commas
    #[default]
    Raw,
    /// Drop whitespace and commas, leaving one value per argument.
    /// Arguments made of several tokens are flattened.
    SplitOnCommas,
}

impl From<bool> for ArgumentPolicy {
    fn from(split: bool) -> Self {
        if split {
            ArgumentPolicy::SplitOnCommas
        } else {
            ArgumentPolicy::Raw
        }
    }
}

/// Accepted spellings in configuration: `true`/`false` or a policy name
#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Flag(bool),
    Named(NamedPolicy),
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
enum NamedPolicy {
    Raw,
    SplitOnCommas,
}

impl From<PolicyRepr> for ArgumentPolicy {
    fn from(repr: PolicyRepr) -> Self {
        match repr {
            PolicyRepr::Flag(split) => split.into(),
            PolicyRepr::Named(NamedPolicy::Raw) => ArgumentPolicy::Raw,
            PolicyRepr::Named(NamedPolicy::SplitOnCommas) => ArgumentPolicy::SplitOnCommas,
        }
    }
}

/// Registry mapping function names to argument policies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionRegistry {
    policies: HashMap<String, ArgumentPolicy>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the policy for `name`
    pub fn register(&mut self, name: impl Into<String>, policy: impl Into<ArgumentPolicy>) {
        self.policies.insert(name.into(), policy.into());
    }

    pub fn lookup(&self, name: &str) -> Option<ArgumentPolicy> {
        self.policies.get(name).copied()
    }

    /// Whether arguments of `name` are split on commas. Absent names keep raw arguments.
    pub fn splits_commas(&self, name: &str) -> bool {
        self.lookup(name) == Some(ArgumentPolicy::SplitOnCommas)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl<K: Into<String>, P: Into<ArgumentPolicy>> FromIterator<(K, P)> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut registry = FunctionRegistry::new();
        for (name, policy) in iter {
            registry.register(name, policy);
        }
        registry
    }
}
