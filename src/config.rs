//! Configuration management for panos-exporter
//!
//! Handles loading and validating configuration from YAML files.
//!
//! ```yaml
//! server:
//!   port: 9654
//! devices:
//!   192.168.1.1:
//!     username: admin
//!     password: secret
//!     api_key: optional-key
//! collectors:
//!   - system_info_collector
//!   - session_collector
//! debug: false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::collector::KNOWN_COLLECTORS;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Device inventory, keyed by the value of the `target` query parameter
    #[serde(default)]
    pub devices: HashMap<String, DeviceConfig>,

    /// Collectors to run; absent means all of them
    #[serde(default)]
    pub collectors: Option<Vec<String>>,

    /// Include failure causes in HTTP error bodies
    #[serde(default)]
    pub debug: bool,
}

/// Per-device credentials for the PAN-OS management API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Basic auth username
    pub username: String,

    /// Basic auth password
    pub password: String,

    /// Optional API key sent as the `key` query parameter
    pub api_key: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

// Default value functions
fn default_port() -> u16 {
    9654
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            path: default_metrics_path(),
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation. Validation failures are fatal at startup; the
    /// request path never sees an invalid configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if self.devices.is_empty() {
            return Err(ConfigError::ValidationError(
                "Config must declare at least one device".to_string(),
            ));
        }

        for (host, device) in &self.devices {
            if device.username.is_empty() || device.password.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Device {} missing username or password",
                    host
                )));
            }
        }

        if let Some(names) = &self.collectors {
            for name in names {
                if !KNOWN_COLLECTORS.contains(&name.as_str()) {
                    return Err(ConfigError::ValidationError(format!(
                        "Unknown collector: {}",
                        name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up the device entry for a scrape target
    pub fn get_device(&self, target: &str) -> Option<&DeviceConfig> {
        self.devices.get(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_yaml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_valid_config() {
        let file = write_temp_yaml(
            r#"
devices:
  192.168.1.1:
    username: u
    password: p
collectors:
  - system_info_collector
  - system_environmentals_collector
"#,
        );
        let config = Config::load(file.path()).expect("config should load");
        assert_eq!(config.server.port, 9654);
        assert!(config.get_device("192.168.1.1").is_some());
        assert!(config.get_device("10.0.0.1").is_none());
        assert_eq!(config.collectors.as_ref().map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_missing_username() {
        let file = write_temp_yaml(
            r#"
devices:
  192.168.1.1:
    username: ""
    password: p
"#,
        );
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_unknown_collector() {
        let file = write_temp_yaml(
            r#"
devices:
  192.168.1.1:
    username: u
    password: p
collectors:
  - not_a_real_collector
"#,
        );
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown collector"));
    }

    #[test]
    fn test_missing_devices() {
        let file = write_temp_yaml("server:\n  port: 9654\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_api_key_optional() {
        let file = write_temp_yaml(
            r#"
devices:
  fw1:
    username: u
    password: p
    api_key: abc123
  fw2:
    username: u
    password: p
"#,
        );
        let config = Config::load(file.path()).expect("config should load");
        assert_eq!(
            config.get_device("fw1").unwrap().api_key.as_deref(),
            Some("abc123")
        );
        assert!(config.get_device("fw2").unwrap().api_key.is_none());
    }
}
