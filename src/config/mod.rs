//! Configuration management for PushBox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use pushbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Selected backend: {:?}", config.client);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the
//! pattern: `PUSHBOX__<key>`
//!
//! Examples:
//! - `PUSHBOX__CLIENT=file_copy`
//! - `PUSHBOX__DELETE_AFTER_UPLOAD=true`
//! - `PUSHBOX__UPLOAD_TIMEOUT_SECS=300`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/pushbox.toml`.
//! This can be overridden using the `PUSHBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::Config;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`PUSHBOX__*`)
    /// 2. TOML file (default: `config/pushbox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// structurally invalid (empty event names, zero timeout).
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
client = "object_store"

[client_config]
provider = "local"
root = "/srv/artifacts"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.selected_client(), Some("object_store"));
        assert_eq!(config.client_config["provider"], serde_json::json!("local"));
    }

    #[test]
    fn test_validation_catches_zero_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
upload_timeout_secs = 0
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(ValidationError::ZeroUploadTimeout))
        ));
    }

    #[test]
    fn test_validation_catches_empty_event_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[[additional_upload_events]]
event_name = ""
payload_path_key = "movie"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(ValidationError::EmptyEventName { .. }))
        ));
    }
}
