// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration.
//!
//! Defaults live in constants here; nothing else hardcodes them.
//!
//! - [`EngineConfig::default`]: built-in constants
//! - [`EngineConfig::from_env`]: `DYNSHAPE_NAMESPACE`, `DYNSHAPE_FIELD_PREFIX`
//! - [`EngineConfig::from_file`] / [`EngineConfig::from_toml_str`]: TOML
//!   (feature `config-loaders`)

#[cfg(feature = "config-loaders")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "config-loaders")]
use std::path::Path;
use thiserror::Error;

/// Namespace prepended to every generated type's qualified name.
pub const DEFAULT_NAMESPACE: &str = "Dynshape.DynamicEntities";

/// Prefix of synthesized backing field names (`Name` -> `_Name`).
pub const DEFAULT_BACKING_FIELD_PREFIX: &str = "_";

/// Name of the change-notification event on notify-capable types.
pub const PROPERTY_CHANGED_EVENT: &str = "PropertyChanged";

/// Environment variable overriding [`EngineConfig::namespace`].
pub const ENV_NAMESPACE: &str = "DYNSHAPE_NAMESPACE";

/// Environment variable overriding [`EngineConfig::backing_field_prefix`].
pub const ENV_FIELD_PREFIX: &str = "DYNSHAPE_FIELD_PREFIX";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-loaders")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by every session of one [`GenerationEngine`](crate::GenerationEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Qualified names are `{namespace}.{name}`; empty means unqualified.
    #[cfg_attr(feature = "config-loaders", serde(default = "default_namespace"))]
    pub namespace: String,

    /// Prefix of backing field names.
    #[cfg_attr(
        feature = "config-loaders",
        serde(default = "default_backing_field_prefix")
    )]
    pub backing_field_prefix: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_backing_field_prefix() -> String {
    DEFAULT_BACKING_FIELD_PREFIX.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            backing_field_prefix: default_backing_field_prefix(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by environment variables when present.
    pub fn from_env() -> Self {
        Self {
            namespace: std::env::var(ENV_NAMESPACE).unwrap_or_else(|_| default_namespace()),
            backing_field_prefix: std::env::var(ENV_FIELD_PREFIX)
                .unwrap_or_else(|_| default_backing_field_prefix()),
        }
    }

    /// Load configuration from a TOML file.
    #[cfg(feature = "config-loaders")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    #[cfg(feature = "config-loaders")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce unusable names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "namespace contains whitespace: {:?}",
                self.namespace
            )));
        }
        if self.backing_field_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "backing field prefix contains whitespace: {:?}",
                self.backing_field_prefix
            )));
        }
        Ok(())
    }

    /// `{namespace}.{name}`, or `name` alone for an empty namespace.
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace, name)
        }
    }

    pub fn backing_field_name(&self, property: &str) -> String {
        format!("{}{}", self.backing_field_prefix, property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_qualify() {
        let config = EngineConfig::default();
        assert_eq!(config.qualify("Customer"), "Dynshape.DynamicEntities.Customer");
        assert_eq!(config.backing_field_name("Name"), "_Name");
    }

    #[test]
    fn test_empty_namespace() {
        let config = EngineConfig {
            namespace: String::new(),
            ..EngineConfig::default()
        };
        assert_eq!(config.qualify("Customer"), "Customer");
    }

    #[test]
    fn test_validate_rejects_whitespace() {
        let config = EngineConfig {
            namespace: "My App".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_NAMESPACE, "Env.Models");
        std::env::set_var(ENV_FIELD_PREFIX, "f_");
        let config = EngineConfig::from_env();
        std::env::remove_var(ENV_NAMESPACE);
        std::env::remove_var(ENV_FIELD_PREFIX);

        assert_eq!(config.qualify("Order"), "Env.Models.Order");
        assert_eq!(config.backing_field_name("Total"), "f_Total");
        assert_eq!(EngineConfig::from_env(), EngineConfig::default());
    }

    #[test]
    #[cfg(feature = "config-loaders")]
    fn test_from_toml_partial() {
        let config = EngineConfig::from_toml_str("namespace = \"Acme.Models\"\n").expect("parse");
        assert_eq!(config.namespace, "Acme.Models");
        assert_eq!(config.backing_field_prefix, DEFAULT_BACKING_FIELD_PREFIX);
    }

    #[test]
    #[cfg(feature = "config-loaders")]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "namespace = \"\"").expect("write");
        writeln!(file, "backing_field_prefix = \"m_\"").expect("write");

        let config = EngineConfig::from_file(file.path()).expect("load");
        assert_eq!(config.qualify("Order"), "Order");
        assert_eq!(config.backing_field_name("Total"), "m_Total");
    }

    #[test]
    #[cfg(feature = "config-loaders")]
    fn test_from_toml_invalid() {
        assert!(matches!(
            EngineConfig::from_toml_str("namespace = 42"),
            Err(ConfigError::Toml(_))
        ));
    }
}
