use crate::error::OptionsError;
use crate::registry::ArgumentPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parser configuration, applied once when a [`crate::Parser`] is built
///
/// ```json
/// { "customFunctions": { "rgba": true, "theme": "split-on-commas" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    /// Function name to argument policy
    #[serde(default)]
    pub custom_functions: HashMap<String, ArgumentPolicy>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_function(mut self, name: impl Into<String>, policy: impl Into<ArgumentPolicy>) -> Self {
        self.custom_functions.insert(name.into(), policy.into());
        self
    }
}
