//! Serial link to the flight controller.
//!
//! Opens the telemetry port with 8N1 framing, auto-detecting the device
//! when no path is configured, and hands the raw byte stream to the
//! relay pipeline.

use crate::error::{RelayError, Result};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

/// Device paths tried during auto-detection (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices (Pixhawk-class flight controllers)
    "/dev/ttyUSB0", // USB-to-serial adapters and telemetry radios
];

/// Flight Controller Serial Port Handler
///
/// Manages the connection the relay reads MAVLink bytes from.
pub struct TelemetrySerial {
    /// Open port the relay reads from
    port: tokio_serial::SerialStream,
    /// Path the port was opened at (e.g. /dev/ttyACM0)
    device_path: String,
}

impl std::fmt::Debug for TelemetrySerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetrySerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl TelemetrySerial {
    /// Open the flight controller link
    ///
    /// An empty `port` means auto-detect: common device paths are tried in
    /// order until one opens. A configured path that fails to open is an
    /// error, never a fallback to auto-detection.
    ///
    /// # Arguments
    ///
    /// * `port` - Device path, or `""` to auto-detect
    /// * `baud_rate` - Link speed in baud
    ///
    /// # Errors
    ///
    /// Returns error if no device could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mav_relay::serial::TelemetrySerial;
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let serial = TelemetrySerial::open("", 57_600)?;
    ///     println!("Connected to: {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(port: &str, baud_rate: u32) -> Result<Self> {
        if port.is_empty() {
            return Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate);
        }

        let stream = Self::open_port(port, baud_rate)?;
        info!("Opened flight controller at {}", port);

        Ok(Self {
            port: stream,
            device_path: port.to_string(),
        })
    }

    /// Probe candidate device paths and keep the first that opens
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Probing serial device {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Found flight controller at {}", path);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Could not open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(RelayError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with 8N1 framing
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| RelayError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Take ownership of the underlying byte stream
    ///
    /// The pipeline reads MAVLink bytes directly from the returned stream.
    pub fn into_stream(self) -> tokio_serial::SerialStream {
        self.port
    }

    /// Device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}
