//! # authz-context
//!
//! Environmental context conditions for authorization policies.
//!
//! A policy rule may be restricted to certain execution environments, for
//! example a single project or a range of source addresses. The environment
//! is supplied at evaluation time as a set of [`Attribute`]s, and each
//! condition is an [`EnvironmentalContext`] that decides whether the
//! environment satisfies it.
//!
//! ## Modules
//!
//! - [`attribute`] - Attributes, the key namespace and standard environments
//! - [`context`] - The context capability and the basic single-attribute context
//! - [`condition`] - Conditions as written in policy documents
//! - [`config`] - Namespace configuration
//! - [`error`] - Error types
//!
//! Combining several contexts into boolean rule trees is left to the policy
//! engine.

pub mod attribute;
pub mod condition;
pub mod config;
pub mod context;
pub mod error;

pub use attribute::{
    APPLICATION_KEY, APPLICATION_NAME, Attribute, DEFAULT_NAMESPACE, EnvironmentNamespace,
    PROJECT_KEY, application_environment, project_environment,
};
pub use condition::EnvironmentCondition;
pub use config::{ConfigError, EnvironmentConfig};
pub use context::{
    BasicEnvironmentalContext, EnvironmentalContext, application_context, project_context,
};
pub use error::ContextError;

/// Type alias for environmental context results.
pub type ContextResult<T> = Result<T, ContextError>;
