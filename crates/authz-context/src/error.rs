//! Environmental context error types.
//!
//! Pattern syntax errors are intentionally absent: a value that fails to
//! compile as a regular expression is matched by equality instead.

/// Errors that can occur while building environmental contexts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// A required argument is missing or unusable.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// The namespace base cannot prefix attribute keys.
    #[error("Invalid namespace: {message}")]
    InvalidNamespace {
        /// Description of why the namespace was rejected.
        message: String,
    },
}

impl ContextError {
    /// Creates a new `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidNamespace` error.
    #[must_use]
    pub fn invalid_namespace(message: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by a policy definition
    /// rather than by engine configuration.
    #[must_use]
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
