//! Daemon configuration.
//!
//! Configuration for lampd, including:
//! - Status stream endpoint
//! - Reconnection backoff bounds
//! - Keepalive interval
//! - Indicator device selection

use std::path::{Path, PathBuf};
use std::time::Duration;

use lamp_link::{BackoffConfig, KeepaliveConfig, LinkConfig, TransportOptions};
use serde::{Deserialize, Serialize};

use crate::error::LampError;

/// Reconnection backoff settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconnectSettings {
    /// Delay before the first reconnection attempt, in milliseconds.
    pub min_delay_ms: u64,
    /// Maximum delay between reconnection attempts, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 60_000,
            multiplier: 2.0,
        }
    }
}

/// Keepalive settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeepaliveSettings {
    /// Interval between liveness probes, in seconds.
    pub interval_secs: u64,
}

impl Default for KeepaliveSettings {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

/// Which indicator driver to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorDriver {
    /// Log colors instead of driving hardware.
    #[default]
    Console,
    /// Write commands to a serial character device.
    Serial,
}

/// Indicator device settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IndicatorSettings {
    /// Driver selection.
    #[serde(default)]
    pub driver: IndicatorDriver,
    /// Device path, required for the serial driver.
    #[serde(default)]
    pub device: Option<PathBuf>,
}

/// Main daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LampConfig {
    /// Status stream WebSocket URL.
    pub stream_url: String,
    /// Reconnection settings.
    #[serde(default)]
    pub reconnect: ReconnectSettings,
    /// Keepalive settings.
    #[serde(default)]
    pub keepalive: KeepaliveSettings,
    /// Indicator settings.
    #[serde(default)]
    pub indicator: IndicatorSettings,
}

impl LampConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LampError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LampError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, LampError> {
        let config: Self =
            toml::from_str(content).map_err(|e| LampError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), LampError> {
        if self.stream_url.is_empty() {
            return Err(LampError::Config("stream_url cannot be empty".to_string()));
        }

        if !self.stream_url.starts_with("ws://") && !self.stream_url.starts_with("wss://") {
            return Err(LampError::Config(
                "stream_url must start with ws:// or wss://".to_string(),
            ));
        }

        if self.reconnect.min_delay_ms == 0 {
            return Err(LampError::Config(
                "reconnect.min_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.reconnect.min_delay_ms > self.reconnect.max_delay_ms {
            return Err(LampError::Config(
                "reconnect.min_delay_ms must not exceed reconnect.max_delay_ms".to_string(),
            ));
        }

        if !self.reconnect.multiplier.is_finite() || self.reconnect.multiplier < 1.0 {
            return Err(LampError::Config(
                "reconnect.multiplier must be a finite value >= 1.0".to_string(),
            ));
        }

        if self.keepalive.interval_secs == 0 {
            return Err(LampError::Config(
                "keepalive.interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.indicator.driver == IndicatorDriver::Serial && self.indicator.device.is_none() {
            return Err(LampError::Config(
                "indicator.device is required for the serial driver".to_string(),
            ));
        }

        Ok(())
    }

    /// Link configuration derived from these settings.
    #[must_use]
    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            address: self.stream_url.clone(),
            options: TransportOptions::default(),
            backoff: BackoffConfig {
                min_delay: Duration::from_millis(self.reconnect.min_delay_ms),
                max_delay: Duration::from_millis(self.reconnect.max_delay_ms),
                multiplier: self.reconnect.multiplier,
            },
            keepalive: KeepaliveConfig {
                interval: Duration::from_secs(self.keepalive.interval_secs),
            },
        }
    }

    /// A sample configuration, for `init-config`.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            stream_url: "ws://127.0.0.1:9200/status".to_string(),
            reconnect: ReconnectSettings::default(),
            keepalive: KeepaliveSettings::default(),
            indicator: IndicatorSettings::default(),
        }
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, LampError> {
        toml::to_string_pretty(self).map_err(|e| LampError::Config(e.to_string()))
    }
}
