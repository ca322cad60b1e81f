//! Configuration for the Pathik daemon
//!
//! Loaded from a TOML file. Every section except `[scenario]` has defaults,
//! so an empty file is a valid configuration.
//!
//! ```toml
//! [network]
//! bind_address = "0.0.0.0:5570"
//!
//! [logging]
//! level = "info"
//!
//! # Optional: initialize the probe before accepting clients
//! [scenario]
//! width = 5
//! height = 5
//! obstacles = [{ x = 1, y = 1 }, { x = 3, y = 3 }]
//! start = { x = 0, y = 0 }
//! direction = "NORTH"
//! ```

use crate::error::Result;
use crate::session::ProbeSetup;
use crate::streaming::wire::DEFAULT_MAX_FRAME_BYTES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Probe placed at startup, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ProbeSetup>,
}

/// TCP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// TCP bind address for client requests
    ///
    /// Examples:
    /// - `0.0.0.0:5570` - Bind to all interfaces on port 5570
    /// - `127.0.0.1:5570` - Localhost only
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Socket read timeout in milliseconds; bounds how long a receiver takes
    /// to notice shutdown
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Largest accepted request frame in bytes; responses are not limited
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            read_timeout_ms: default_read_timeout_ms(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:5570".to_string()
}
fn default_read_timeout_ms() -> u64 {
    500
}
fn default_max_frame_bytes() -> usize {
    DEFAULT_MAX_FRAME_BYTES
}
fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use pathik::config::AppConfig;
    ///
    /// let config = AppConfig::load("pathik.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GridCoord, Heading};
    use crate::error::Error;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.network.bind_address, "0.0.0.0:5570");
        assert_eq!(config.network.read_timeout_ms, 500);
        assert_eq!(config.network.max_frame_bytes, 65536);
        assert_eq!(config.logging.level, "info");
        assert!(config.scenario.is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.network.bind_address, "0.0.0.0:5570");
        assert!(config.scenario.is_none());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[network]
bind_address = "127.0.0.1:6000"

[logging]
level = "debug"

[scenario]
width = 5
height = 5
obstacles = [{ x = 1, y = 1 }, { x = 3, y = 3 }]
start = { x = 0, y = 0 }
direction = "NORTH"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.network.bind_address, "127.0.0.1:6000");
        // Unset keys in a present section still default
        assert_eq!(config.network.read_timeout_ms, 500);
        assert_eq!(config.logging.level, "debug");

        let scenario = config.scenario.unwrap();
        assert_eq!(scenario.width, 5);
        assert_eq!(scenario.obstacles.len(), 2);
        assert_eq!(scenario.start, GridCoord::new(0, 0));
        assert_eq!(scenario.direction, Heading::North);
    }

    #[test]
    fn test_bad_direction_is_config_error() {
        let toml_content = r#"
[scenario]
width = 1
height = 1
start = { x = 0, y = 0 }
direction = "UP"
"#;
        let err: Error = toml::from_str::<AppConfig>(toml_content).unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathik.toml");

        let mut config = AppConfig::default();
        config.network.bind_address = "127.0.0.1:7000".to_string();
        config.scenario = Some(ProbeSetup {
            width: 2,
            height: 2,
            obstacles: vec![GridCoord::new(1, 0)],
            start: GridCoord::new(0, 0),
            direction: Heading::East,
        });
        config.to_file(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.network.bind_address, "127.0.0.1:7000");
        assert_eq!(loaded.scenario, config.scenario);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/pathik.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
