//! # MAV Relay
//!
//! Relay MAVLink flight-controller telemetry from a serial link to
//! WebSocket subscribers.
//!
//! The relay splits and validates MAVLink frames from the flight
//! controller, decodes them against a built-in schema registry, and fans
//! decoded messages out to WebSocket subscribers while appending them to
//! per-day flight logs. Subscribers switch the stream on and off over the
//! same WebSocket connection.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use mav_relay::config::Config;
use mav_relay::flightlog::FlightLog;
use mav_relay::hub::server::SubscriberServer;
use mav_relay::hub::BroadcastHub;
use mav_relay::mavlink::schema::SchemaRegistry;
use mav_relay::relay::pipeline::RelayPipeline;
use mav_relay::serial::TelemetrySerial;

/// Main entry point for the MAV Relay application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Install the non-blocking tracing subscriber
///    - Load configuration (first CLI argument, built-in defaults otherwise)
///    - Build the schema registry and start the flight log
///    - Bind the subscriber endpoint and open the serial link
///
/// 2. **Main Loop**
///    - Pipeline task: read serial bytes, split, decode, gate, fan out
///    - Server task: accept subscribers, push events, take gate commands
///
/// 3. **Graceful Shutdown**
///    - Ctrl+C stops the process
///    - If the serial stream ends first, the relay keeps serving
///      subscribers and the flight log until Ctrl+C
///
/// # Errors
///
/// Returns error if:
/// - Configuration cannot be loaded
/// - The subscriber endpoint cannot be bound
/// - No serial device can be opened
///
/// # Examples
///
/// Run the application:
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO mav_relay: MAV Relay v0.1.0 starting...
/// INFO mav_relay: Schema registry ready: 17 message types from minimal, common, ardupilotmega
/// INFO mav_relay::hub::server: Subscriber endpoint listening on 0.0.0.0:3000
/// INFO mav_relay::serial: Opened flight controller at /dev/ttyACM0
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with a non-blocking stdout writer
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .init();

    info!("MAV Relay v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(&path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // Build the message schema registry
    let registry = Arc::new(SchemaRegistry::standard());
    info!(
        "Schema registry ready: {} message types from {}",
        registry.len(),
        registry.vocabulary_names().join(", ")
    );

    // Start the flight log
    let (flight_log, _log_task) = FlightLog::spawn(config.log.dir.clone());
    info!("Flight log directory: {}", config.log.dir);

    // Wire the hub and the subscriber endpoint
    let hub = Arc::new(BroadcastHub::new(
        flight_log.clone(),
        config.server.event_buffer,
    ));
    let (commands, command_rx) = tokio::sync::mpsc::unbounded_channel();

    let server =
        SubscriberServer::bind(config.server.socket_addr()?, Arc::clone(&hub), commands).await?;
    tokio::spawn(server.run());

    // Open the serial link and start the pipeline
    let serial = TelemetrySerial::open(&config.serial.port, config.serial.baud_rate)?;
    info!("Relaying telemetry from {}", serial.device_path());

    let pipeline = RelayPipeline::new(registry, Arc::clone(&hub), flight_log);
    let pipeline_task = tokio::spawn(pipeline.run(serial.into_stream(), command_rx));

    info!("Press Ctrl+C to exit");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }

        result = pipeline_task => {
            match result {
                Ok(Ok(())) => warn!("Serial stream ended, still serving subscribers"),
                Ok(Err(e)) => error!("Relay pipeline failed: {}", e),
                Err(e) => error!("Relay pipeline task panicked: {}", e),
            }

            // Subscribers and the flight log stay up until asked to exit
            tokio::signal::ctrl_c().await?;
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}
