//! # Relay Pipeline
//!
//! Drives bytes from the flight controller all the way to subscribers:
//!
//! 1. Accumulate serial chunks and split validated frames
//! 2. Decode each frame against the schema registry
//! 3. Normalize wide integer fields to decimal strings
//! 4. Drop everything while the transmission gate is idle
//! 5. Publish to the hub and append to the flight log
//!
//! Decoding happens whether or not the gate is open, so schema problems
//! surface in diagnostics even before a subscriber asks for data. Frames
//! that fail checksum, lookup or decode never produce output.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use super::gate::{GateCommand, TransmissionGate};
use crate::error::Result;
use crate::flightlog::FlightLog;
use crate::hub::events::OutboundEvent;
use crate::hub::BroadcastHub;
use crate::mavlink::decoder;
use crate::mavlink::message::DecodedMessage;
use crate::mavlink::normalize;
use crate::mavlink::protocol::RawFrame;
use crate::mavlink::schema::SchemaRegistry;
use crate::mavlink::splitter::{FrameSplitter, SplitterStats};

/// Serial read chunk capacity
const READ_CHUNK_SIZE: usize = 4096;

/// Emit a stats line every this many validated frames
const STATS_INTERVAL_FRAMES: u64 = 1000;

/// Counters for frames that made it past the splitter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Messages broadcast and logged
    pub published: u64,

    /// Messages decoded then discarded because the gate was idle
    pub suppressed: u64,

    /// Frames dropped for an id missing from the registry
    pub unknown: u64,

    /// Frames rejected by the decoder
    pub rejected: u64,
}

/// Everything between the serial port and the subscribers
pub struct RelayPipeline {
    registry: Arc<SchemaRegistry>,
    splitter: FrameSplitter,
    gate: TransmissionGate,
    hub: Arc<BroadcastHub>,
    log: FlightLog,
    stats: PipelineStats,
}

impl RelayPipeline {
    pub fn new(registry: Arc<SchemaRegistry>, hub: Arc<BroadcastHub>, log: FlightLog) -> Self {
        Self {
            registry,
            splitter: FrameSplitter::new(),
            gate: TransmissionGate::new(),
            hub,
            log,
            stats: PipelineStats::default(),
        }
    }

    /// Read the serial stream and serve gate commands until the stream ends
    ///
    /// Pending commands are applied before the next chunk is ingested, so a
    /// stop request takes effect ahead of any bytes read after it.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the stream fails. A clean
    /// end-of-stream is not an error.
    pub async fn run<R>(
        mut self,
        mut reader: R,
        mut commands: UnboundedReceiver<GateCommand>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut chunk = BytesMut::with_capacity(READ_CHUNK_SIZE);
        let mut commands_open = true;

        loop {
            tokio::select! {
                biased;

                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.apply_command(command),
                    None => commands_open = false,
                },

                read = reader.read_buf(&mut chunk) => match read {
                    Ok(0) => {
                        warn!("Telemetry stream ended");
                        return Ok(());
                    }
                    Ok(_) => {
                        self.ingest(&chunk);
                        chunk.clear();
                    }
                    Err(error) => return Err(error.into()),
                },
            }
        }
    }

    /// Apply a gate command
    ///
    /// The transition is recorded in the flight log every time, even when
    /// the gate was already in the requested state.
    pub fn apply_command(&mut self, command: GateCommand) {
        let changed = self.gate.apply(command);
        let description = match command {
            GateCommand::Start => "Data transmission started",
            GateCommand::Stop => "Data transmission stopped",
        };

        if changed {
            info!("{}", description);
        } else {
            debug!("{} (already in effect)", description);
        }
        self.log.append_event(description);
    }

    /// Feed raw serial bytes and handle every frame they complete
    pub fn ingest(&mut self, chunk: &[u8]) {
        self.splitter.push(chunk);

        while let Some(frame) = self.splitter.next_frame() {
            self.handle_frame(&frame);

            if self.splitter.stats().frames % STATS_INTERVAL_FRAMES == 0 {
                self.report_stats();
            }
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn splitter_stats(&self) -> SplitterStats {
        self.splitter.stats()
    }

    pub fn is_transmitting(&self) -> bool {
        self.gate.is_transmitting()
    }

    fn handle_frame(&mut self, frame: &RawFrame) {
        let Some(schema) = self.registry.lookup(frame.message_id) else {
            self.stats.unknown += 1;
            debug!("Dropping frame with unknown message id {}", frame.message_id);
            return;
        };

        let mut message = match decoder::decode_with(frame, schema) {
            Ok(message) => message,
            Err(error) => {
                self.stats.rejected += 1;
                debug!("Rejecting frame: {}", error);
                return;
            }
        };

        normalize::apply(schema, &mut message);

        if !self.gate.is_transmitting() {
            self.stats.suppressed += 1;
            return;
        }

        match self.forward(&message) {
            Ok(()) => self.stats.published += 1,
            Err(error) => warn!("Failed to serialize {} message: {}", message.name, error),
        }
    }

    fn forward(&mut self, message: &DecodedMessage) -> Result<()> {
        let event = serde_json::to_string(&OutboundEvent::TelemetryData { data: message })?;
        let line = serde_json::to_string(message)?;

        self.hub.publish(Arc::from(event));
        self.log.append_message(line);
        Ok(())
    }

    fn report_stats(&self) {
        let splitter = self.splitter.stats();
        info!(
            "Relay stats: {} frames, {} published, {} suppressed, {} unknown, {} rejected, {} checksum failures, {} bytes discarded",
            splitter.frames,
            self.stats.published,
            self.stats.suppressed,
            self.stats.unknown,
            self.stats.rejected,
            splitter.crc_failures,
            splitter.discarded_bytes,
        );
    }
}
