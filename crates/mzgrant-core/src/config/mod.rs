//! Configuration types for mzgrant.
//!
//! Configuration is read from a single YAML file (`mzgrant.yaml` by default):
//!
//! ```yaml
//! connection:
//!   database_url_env: MZGRANT_DATABASE_URL
//!   host: localhost
//!   port: 6875
//!   username: materialize
//! logging:
//!   level: info
//! ```
//!
//! Every section is optional; command-line flags override file values.

pub mod connection;
pub mod logging;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use connection::{ConnectionConfig, ConnectionPoolConfig, SslMode};
pub use logging::LoggingConfig;

/// Complete mzgrant configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MzgrantConfig {
    /// Database connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MzgrantConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_default() {
        let config = MzgrantConfig::from_yaml("").unwrap();
        assert_eq!(config.connection.port, 6875);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "connection:\n  host: mz.internal\n  port: 6877\n  username: mz_system\nlogging:\n  level: debug"
        )
        .unwrap();

        let config = MzgrantConfig::from_file(file.path()).unwrap();
        assert_eq!(config.connection.host, "mz.internal");
        assert_eq!(config.connection.port, 6877);
        assert_eq!(config.connection.username, "mz_system");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = MzgrantConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.connection.database, "materialize");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            MzgrantConfig::from_yaml("connection: [unterminated"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
