//! Relay server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for one relay server process.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct RelayConfig {
    /// Address the listener binds to (`host:port`).
    #[serde(default = "default_listen_addr")]
    #[setters(into)]
    listen_addr: String,

    /// Refuse moves from the player whose turn it is not.
    #[serde(default = "default_enforce_turns")]
    enforce_turns: bool,

    /// Honour reset requests once a game is decided.
    #[serde(default = "default_allow_reset")]
    allow_reset: bool,

    /// Messages queued per connection before senders wait.
    #[serde(default = "default_outbound_buffer")]
    outbound_buffer: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_enforce_turns() -> bool {
    true
}

fn default_allow_reset() -> bool {
    true
}

fn default_outbound_buffer() -> usize {
    32
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enforce_turns: default_enforce_turns(),
            allow_reset: default_allow_reset(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(listen_addr = %config.listen_addr, "Config loaded successfully");
        Ok(config)
    }

    /// Checks values serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.trim().is_empty() {
            return Err(ConfigError::new("listen_addr must not be empty"));
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::new("outbound_buffer must be at least 1"));
        }
        Ok(())
    }

    /// Channel capacity for a connection's outbound queue (never zero).
    pub fn outbound_capacity(&self) -> usize {
        self.outbound_buffer.max(1)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RelayConfig::from_toml("").unwrap();
        assert_eq!(config, RelayConfig::default());
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert!(*config.enforce_turns());
        assert!(*config.allow_reset());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = RelayConfig::from_toml(
            r#"
            listen_addr = "0.0.0.0:9000"
            enforce_turns = false
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
        assert!(!*config.enforce_turns());
        assert_eq!(*config.outbound_buffer(), 32);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = RelayConfig::from_toml("outbound_buffer = 0").unwrap_err();
        assert!(err.message.contains("outbound_buffer"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(RelayConfig::from_toml("listen_addr = ").is_err());
    }

    #[test]
    fn test_setters_chain() {
        let config = RelayConfig::default()
            .with_listen_addr("127.0.0.1:0")
            .with_allow_reset(false);
        assert_eq!(config.listen_addr(), "127.0.0.1:0");
        assert!(!*config.allow_reset());
    }
}
