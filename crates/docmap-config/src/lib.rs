//! Persister configuration.
//!
//! Configuration is read from the `[persister]` table of a TOML file. Every
//! key is optional; missing keys fall back to the defaults below.
//!
//! ```toml
//! [persister]
//! operator_prefix = "$"
//! identifier_field = "_id"
//! discriminator_field = "_class"
//! default_database = "default"
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

///
/// PersisterConfig
///
/// Naming conventions used when rendering wire documents.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersisterConfig {
    /// Prefix prepended to update operators and reference keys (`$set`, `$ref`).
    pub operator_prefix: String,

    /// Wire field that stores the document identifier.
    pub identifier_field: String,

    /// Discriminator field used when an association does not name its own.
    pub discriminator_field: String,

    /// Database written into references when the target class names none.
    pub default_database: String,
}

impl Default for PersisterConfig {
    fn default() -> Self {
        Self {
            operator_prefix: "$".to_string(),
            identifier_field: "_id".to_string(),
            discriminator_field: "_class".to_string(),
            default_database: "default".to_string(),
        }
    }
}

impl PersisterConfig {
    /// Parse and validate a config from TOML source text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        file.persister.validate()?;

        Ok(file.persister)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    /// Check naming invariants that the wire format depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operator_prefix.contains('.') {
            return Err(ConfigError::InvalidValue {
                key: "operator_prefix",
                reason: "must not contain '.'".to_string(),
            });
        }

        for (key, value) in [
            ("identifier_field", &self.identifier_field),
            ("discriminator_field", &self.discriminator_field),
            ("default_database", &self.default_database),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: "must not be empty".to_string(),
                });
            }
            if value.contains('.') {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("'{value}' must not contain '.'"),
                });
            }
        }

        Ok(())
    }

    /// Render an operator or reserved key with the configured prefix.
    #[must_use]
    pub fn prefixed(&self, name: &str) -> String {
        format!("{}{name}", self.operator_prefix)
    }
}

///
/// ConfigFile
///

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    persister: PersisterConfig,
}

///
/// TESTS
///
