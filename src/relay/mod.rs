//! # Telemetry Relay
//!
//! The pipeline connecting the serial byte stream to subscribers: frame
//! splitting, decoding, normalization, gating and fan-out, plus the
//! transmission gate subscribers toggle over the control channel.

pub mod gate;
pub mod pipeline;
