//! Environment attributes and the namespace that identifies them.
//!
//! An execution environment is described by a set of [`Attribute`]s. Each
//! attribute's property is a URI formed by prefixing a short key (such as
//! `project` or `sourceip`) with the base of an [`EnvironmentNamespace`].
//!
//! ```ignore
//! use authz_context::{EnvironmentNamespace, project_environment};
//!
//! let namespace = EnvironmentNamespace::default();
//! let env = project_environment(&namespace, "ops")?;
//! assert_eq!(env.len(), 1);
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ContextResult;
use crate::error::ContextError;

/// Base URI used when no namespace is configured.
pub const DEFAULT_NAMESPACE: &str = "http://dtolabs.com/rundeck/env/";

/// Key of the attribute naming the project a request runs in.
pub const PROJECT_KEY: &str = "project";

/// Key of the attribute naming the application-wide environment.
pub const APPLICATION_KEY: &str = "application";

/// Value of the application-wide environment attribute.
pub const APPLICATION_NAME: &str = "rundeck";

// =============================================================================
// Attribute
// =============================================================================

/// A single fact about the execution environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Canonical property identifier.
    pub property: Url,

    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// Create an attribute from an already canonical property.
    #[must_use]
    pub fn new(property: Url, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.property, self.value)
    }
}

// =============================================================================
// Environment Namespace
// =============================================================================

/// Namespace that turns short attribute keys into canonical identifiers.
///
/// The base must be an absolute, hierarchical URI ending in `/`. Keys are
/// appended verbatim, so `sourceip` under the default namespace becomes
/// `http://dtolabs.com/rundeck/env/sourceip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvironmentNamespace {
    base: Url,
}

impl Default for EnvironmentNamespace {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_NAMESPACE).expect("default namespace is a valid URI"),
        }
    }
}

impl EnvironmentNamespace {
    /// Create a namespace from a base URI.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::InvalidNamespace` if the base does not parse,
    /// cannot carry a path, or does not end in `/`.
    pub fn new(base: &str) -> ContextResult<Self> {
        let parsed = Url::parse(base)
            .map_err(|e| ContextError::invalid_namespace(format!("'{base}': {e}")))?;

        if parsed.cannot_be_a_base() {
            return Err(ContextError::invalid_namespace(format!(
                "'{base}' is not a hierarchical URI"
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ContextError::invalid_namespace(format!(
                "'{base}' must not carry a query or fragment"
            )));
        }
        if !parsed.as_str().ends_with('/') {
            return Err(ContextError::invalid_namespace(format!(
                "'{base}' must end with '/'"
            )));
        }

        Ok(Self { base: parsed })
    }

    /// The base URI keys are appended to.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Derive the canonical identifier for a key.
    ///
    /// The key is appended to the base verbatim. Keys the URI parser would
    /// rewrite (dot segments, spaces and other characters that need
    /// percent-encoding) are rejected, so distinct keys never share an
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::InvalidArgument` if the key does not form a
    /// URI or does not survive parsing unchanged (e.g. `../other`).
    pub fn key_uri(&self, key: &str) -> ContextResult<Url> {
        let raw = format!("{}{}", self.base, key);
        let uri = Url::parse(&raw)
            .map_err(|e| ContextError::invalid_argument(format!("key '{key}': {e}")))?;

        if uri.as_str() != raw {
            return Err(ContextError::invalid_argument(format!(
                "key '{key}' is not a literal identifier under namespace {}",
                self.base
            )));
        }

        Ok(uri)
    }

    /// Build an attribute for a key under this namespace.
    ///
    /// # Errors
    ///
    /// Same as [`EnvironmentNamespace::key_uri`].
    pub fn attribute(&self, key: &str, value: impl Into<String>) -> ContextResult<Attribute> {
        Ok(Attribute::new(self.key_uri(key)?, value))
    }
}

// =============================================================================
// Standard Environments
// =============================================================================

/// Environment consisting of a single project attribute.
///
/// # Errors
///
/// Propagates errors from [`EnvironmentNamespace::attribute`].
pub fn project_environment(
    namespace: &EnvironmentNamespace,
    project: impl Into<String>,
) -> ContextResult<HashSet<Attribute>> {
    Ok(HashSet::from([namespace.attribute(PROJECT_KEY, project)?]))
}

/// Environment consisting of the application-wide attribute.
///
/// # Errors
///
/// Propagates errors from [`EnvironmentNamespace::attribute`].
pub fn application_environment(
    namespace: &EnvironmentNamespace,
) -> ContextResult<HashSet<Attribute>> {
    Ok(HashSet::from([
        namespace.attribute(APPLICATION_KEY, APPLICATION_NAME)?
    ]))
}
