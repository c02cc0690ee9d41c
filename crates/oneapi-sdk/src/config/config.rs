//! `Config` struct and TOML loading.

use std::path::Path;

use serde::Deserialize;

use super::paths::resolve_config_path;
use crate::error::{OneApiError, Result};

/// Static configuration read from `config.toml`.
///
/// ```toml
/// api-key = "your-key"
///
/// [networking]
/// log-traffic = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// API key issued by the-one-api.dev.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Networking settings.
    #[serde(default)]
    pub networking: NetworkingConfig,
}

/// Networking configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkingConfig {
    /// Log request and response lines at `info` instead of `debug`.
    #[serde(default)]
    pub log_traffic: bool,
}

impl Config {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::ConfigFile` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| OneApiError::ConfigFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let config = Self::from_toml(&content).map_err(|e| OneApiError::ConfigFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Loads config from `{dir}/config.toml`, or from `oneapi/config.toml` under
    /// `$XDG_CONFIG_HOME` (else `~/.config`) when `dir` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the file is invalid.
    pub fn load_from_dir(dir: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(dir)?;
        Self::load(&path)
    }

    /// Parses config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the content does not match the schema.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// API key with surrounding whitespace removed; `None` when absent or blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    /// Whether traffic logging is enabled.
    #[must_use]
    pub const fn log_traffic(&self) -> bool {
        self.networking.log_traffic
    }
}

/// Trims `value`; blank strings count as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = Config::default();

        // Assert
        assert!(config.api_key().is_none());
        assert!(!config.log_traffic());
    }

    #[test]
    fn test_parse_full_config() {
        // Arrange
        let toml_str = "api-key = \"abc123\"\n\n[networking]\nlog-traffic = true\n";

        // Act
        let config = Config::from_toml(toml_str).unwrap();

        // Assert
        assert_eq!(config.api_key(), Some("abc123"));
        assert!(config.log_traffic());
    }

    #[test]
    fn test_blank_api_key_counts_as_absent() {
        // Arrange
        let config = Config::from_toml("api-key = \"   \"\n").unwrap();

        // Act & Assert
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_api_key_is_trimmed() {
        // Arrange
        let config = Config::from_toml("api-key = \"  abc123\\n\"\n").unwrap();

        // Act & Assert
        assert_eq!(config.api_key(), Some("abc123"));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = Config::load(&path).unwrap();

        // Assert
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "api-key = \"from-file\"\n").unwrap();

        // Act
        let config = Config::load_from_dir(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(config.api_key(), Some("from-file"));
        assert!(!config.log_traffic());
    }

    #[test]
    fn test_load_empty_file_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = Config::load(&path).unwrap();

        // Assert
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api-key = [1, 2]\n").unwrap();

        // Act
        let result = Config::load(&path);

        // Assert
        assert!(matches!(result, Err(OneApiError::ConfigFile { .. })));
    }
}
