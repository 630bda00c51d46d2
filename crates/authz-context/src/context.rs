//! Environmental context conditions.
//!
//! An environmental context is a policy-declared condition that an execution
//! environment must satisfy for a rule to apply. The policy engine holds
//! contexts behind the [`EnvironmentalContext`] trait and combines their
//! results itself; a single context only ever evaluates one attribute.
//!
//! # Usage
//!
//! ```ignore
//! use authz_context::{BasicEnvironmentalContext, EnvironmentNamespace};
//!
//! let namespace = EnvironmentNamespace::default();
//! let context = BasicEnvironmentalContext::for_pattern(&namespace, "project", "ops-.*")?;
//!
//! let env = project_environment(&namespace, "ops-east")?;
//! assert!(context.matches(&env));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use regex_syntax::hir::{Hir, Look};
use url::Url;

use crate::attribute::{
    APPLICATION_KEY, APPLICATION_NAME, Attribute, EnvironmentNamespace, PROJECT_KEY,
};
use crate::ContextResult;

// =============================================================================
// Capability
// =============================================================================

/// Shared contract of environmental context conditions.
pub trait EnvironmentalContext: fmt::Debug + Send + Sync {
    /// Returns `true` if the environment satisfies this condition.
    fn matches(&self, environment: &HashSet<Attribute>) -> bool;

    /// Returns `true` if the condition can be evaluated at all.
    fn is_valid(&self) -> bool;

    /// Short attribute key this condition applies to.
    fn key(&self) -> &str;

    /// Expected value.
    fn value(&self) -> &str;

    /// Compiled full-match pattern for the value, if any.
    fn value_pattern(&self) -> Option<&Regex>;
}

// =============================================================================
// Basic Environmental Context
// =============================================================================

/// Matches a single attribute by value equality, or by regular expression if
/// the value compiled as one.
///
/// Environments with zero or several attributes never match.
///
/// Two contexts built from the same key and value are equal and hash the same
/// regardless of which factory produced them, so the policy engine can
/// deduplicate identical conditions across rules.
#[derive(Debug, Clone)]
pub struct BasicEnvironmentalContext {
    key: String,
    value: String,
    value_pattern: Option<Regex>,
    key_uri: Url,
}

impl BasicEnvironmentalContext {
    fn build(
        namespace: &EnvironmentNamespace,
        key: String,
        value: String,
        value_pattern: Option<Regex>,
    ) -> ContextResult<Self> {
        let key_uri = namespace.key_uri(&key)?;

        tracing::debug!(
            key = %key,
            key_uri = %key_uri,
            pattern = value_pattern.is_some(),
            "Built environmental context"
        );

        Ok(Self {
            key,
            value,
            value_pattern,
            key_uri,
        })
    }

    /// Context that matches the value by equality, and as a regular
    /// expression if it is one.
    ///
    /// A value that is not valid regex syntax is still accepted and matched
    /// by equality only.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::InvalidArgument` if the key cannot be placed
    /// under the namespace.
    pub fn for_pattern(
        namespace: &EnvironmentNamespace,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> ContextResult<Self> {
        let value = value.into();
        let value_pattern = compile_full_match(&value);
        Self::build(namespace, key.into(), value, value_pattern)
    }

    /// Context that matches the value by equality only.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::InvalidArgument` if the key cannot be placed
    /// under the namespace.
    pub fn for_static(
        namespace: &EnvironmentNamespace,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> ContextResult<Self> {
        Self::build(namespace, key.into(), value.into(), None)
    }

    /// Canonical identifier compared against attribute properties.
    #[must_use]
    pub fn key_uri(&self) -> &Url {
        &self.key_uri
    }

    fn value_matches(&self, candidate: &str) -> bool {
        self.value == candidate
            || self
                .value_pattern
                .as_ref()
                .is_some_and(|re| re.is_match(candidate))
    }
}

/// Compile a value so that it only matches whole strings.
///
/// The anchors are added to the parsed expression rather than to the source
/// text, so comments and flags in the value cannot swallow them.
fn compile_full_match(value: &str) -> Option<Regex> {
    Regex::new(value).ok()?;
    let hir = regex_syntax::parse(value).ok()?;
    let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
    Regex::new(&anchored.to_string()).ok()
}

impl EnvironmentalContext for BasicEnvironmentalContext {
    fn matches(&self, environment: &HashSet<Attribute>) -> bool {
        if environment.len() != 1 {
            tracing::trace!(
                context = %self,
                attributes = environment.len(),
                "Environment is not a single attribute"
            );
            return false;
        }

        let matched = environment
            .iter()
            .next()
            .is_some_and(|attr| attr.property == self.key_uri && self.value_matches(&attr.value));

        tracing::trace!(context = %self, matched, "Evaluated environmental context");
        matched
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn value_pattern(&self) -> Option<&Regex> {
        self.value_pattern.as_ref()
    }
}

impl PartialEq for BasicEnvironmentalContext {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value && self.key_uri == other.key_uri
    }
}

impl Eq for BasicEnvironmentalContext {}

impl Hash for BasicEnvironmentalContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for BasicEnvironmentalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}='{}'}}", self.key, self.value)
    }
}

// =============================================================================
// Standard Contexts
// =============================================================================

/// Context requiring the project attribute to equal `project`.
///
/// # Errors
///
/// Propagates errors from [`BasicEnvironmentalContext::for_static`].
pub fn project_context(
    namespace: &EnvironmentNamespace,
    project: impl Into<String>,
) -> ContextResult<BasicEnvironmentalContext> {
    BasicEnvironmentalContext::for_static(namespace, PROJECT_KEY, project)
}

/// Context requiring the application-wide environment.
///
/// # Errors
///
/// Propagates errors from [`BasicEnvironmentalContext::for_static`].
pub fn application_context(
    namespace: &EnvironmentNamespace,
) -> ContextResult<BasicEnvironmentalContext> {
    BasicEnvironmentalContext::for_static(namespace, APPLICATION_KEY, APPLICATION_NAME)
}

// =============================================================================
// Tests
// =============================================================================
