//! TOML configuration with per-key defaults and validation.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::Result;

/// Top-level relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub serial: SerialConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

/// Flight controller link settings
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device path; empty means auto-detect
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Subscriber endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Events buffered per subscriber before a laggard is disconnected
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

/// Flight log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

// Serde defaults
fn default_serial_port() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { 57_600 }

fn default_listen_addr() -> String { "0.0.0.0:3000".to_string() }
fn default_event_buffer() -> usize { 256 }

fn default_log_dir() -> String { "./logs".to_string() }

/// Telemetry link speeds the relay accepts
const VALID_BAUD_RATES: &[u32] = &[
    9_600, 19_200, 38_400, 57_600, 115_200, 230_400, 460_800, 921_600,
];

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig {
                port: default_serial_port(),
                baud_rate: default_baud_rate(),
            },
            server: ServerConfig {
                listen_addr: default_listen_addr(),
                event_buffer: default_event_buffer(),
            },
            log: LogConfig {
                dir: default_log_dir(),
            },
        }
    }
}

impl ServerConfig {
    /// Parsed listen address
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `listen_addr` is not a valid
    /// socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|_| {
            crate::error::RelayError::Config(toml::de::Error::custom(format!(
                "invalid listen_addr: {}",
                self.listen_addr
            )))
        })
    }
}

impl Config {
    /// Read a configuration file, parse it, and validate the result
    ///
    /// Missing keys take their defaults; a file containing only section
    /// headers yields the same configuration as [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or
    /// fails validation
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mav_relay::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the relay could not run with
    fn validate(&self) -> Result<()> {
        // Serial port may be empty (auto-detect), but the baud rate must be
        // one the telemetry link can actually run at
        if !VALID_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(crate::error::RelayError::Config(toml::de::Error::custom(
                format!(
                    "baud_rate must be one of: {}",
                    VALID_BAUD_RATES
                        .iter()
                        .map(|rate| rate.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )));
        }

        self.server.socket_addr()?;

        if self.server.event_buffer == 0 || self.server.event_buffer > 65_536 {
            return Err(crate::error::RelayError::Config(toml::de::Error::custom(
                "event_buffer must be between 1 and 65536",
            )));
        }

        if self.log.dir.is_empty() {
            return Err(crate::error::RelayError::Config(toml::de::Error::custom(
                "log dir cannot be empty",
            )));
        }

        Ok(())
    }
}
