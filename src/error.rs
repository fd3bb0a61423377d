//! Relay error types, built on `thiserror`.

use thiserror::Error;

/// Main error type for MAV Relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// MAVLink framing and payload errors
    #[error("MAVLink protocol error: {0}")]
    Protocol(String),

    /// Message-type id absent from the schema registry
    #[error("unknown message id {0}")]
    UnknownMessage(u32),

    /// Unreadable or out-of-range configuration
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial port error: {0}")]
    Serial(String),

    /// No serial device found among candidate paths
    #[error("No serial device found (tried: {0})")]
    SerialPortNotFound(String),

    /// Underlying stream and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for MAV Relay
pub type Result<T> = std::result::Result<T, RelayError>;
