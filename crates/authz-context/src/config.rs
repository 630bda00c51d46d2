//! Environmental context configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! namespace = "http://dtolabs.com/rundeck/env/"
//! ```

use serde::{Deserialize, Serialize};

use crate::attribute::{DEFAULT_NAMESPACE, EnvironmentNamespace};

/// Configuration of the environment attribute namespace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Base URI prefixed to attribute keys.
    /// Must be absolute and end with `/`.
    pub namespace: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// The configuration source could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

impl EnvironmentConfig {
    /// Parse configuration from a TOML document.
    ///
    /// Missing fields take their defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::InvalidValue` if validation fails.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)
            .map_err(|e| ConfigError::Parse(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the namespace is empty or not a
    /// usable base URI.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.namespace().map(|_| ())
    }

    /// Build the namespace described by this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`EnvironmentConfig::validate`].
    pub fn namespace(&self) -> Result<EnvironmentNamespace, ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::InvalidValue(
                "namespace cannot be empty".to_string(),
            ));
        }

        EnvironmentNamespace::new(&self.namespace)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
