//! Environmental conditions as written in policy documents.
//!
//! Policy documents describe a context with an optional key, an optional
//! value and a flag choosing between pattern and literal matching. Missing
//! entries are rejected when the condition is turned into a context.
//!
//! ```json
//! { "key": "sourceip", "value": "10\\.0\\..*" }
//! { "key": "project", "value": "ops", "regex": false }
//! ```

use serde::{Deserialize, Serialize};

use crate::attribute::EnvironmentNamespace;
use crate::context::BasicEnvironmentalContext;
use crate::ContextResult;
use crate::error::ContextError;

/// Serialized form of an environmental context condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCondition {
    /// Attribute key the condition applies to.
    #[serde(default)]
    pub key: Option<String>,

    /// Expected value.
    #[serde(default)]
    pub value: Option<String>,

    /// Treat the value as a regular expression when it is one.
    #[serde(default = "default_regex")]
    pub regex: bool,
}

fn default_regex() -> bool {
    true
}

impl Default for EnvironmentCondition {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
            regex: default_regex(),
        }
    }
}

impl EnvironmentCondition {
    /// Condition matched by equality or regular expression.
    #[must_use]
    pub fn pattern(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            regex: true,
        }
    }

    /// Condition matched by equality only.
    #[must_use]
    pub fn literal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            regex: false,
        }
    }

    /// Build the environmental context this condition describes.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::InvalidArgument` if the key or value is missing,
    /// or if the key cannot be placed under the namespace.
    pub fn to_context(
        &self,
        namespace: &EnvironmentNamespace,
    ) -> ContextResult<BasicEnvironmentalContext> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| ContextError::invalid_argument("key cannot be null"))?;
        let value = self
            .value
            .as_deref()
            .ok_or_else(|| ContextError::invalid_argument("value cannot be null"))?;

        if self.regex {
            BasicEnvironmentalContext::for_pattern(namespace, key, value)
        } else {
            BasicEnvironmentalContext::for_static(namespace, key, value)
        }
    }
}
