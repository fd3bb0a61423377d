//! # MAVLink Protocol
//!
//! Wire-level handling for MAVLink telemetry:
//!
//! - Frame extraction and checksum validation ([`splitter`])
//! - Message vocabularies and schema lookup ([`schema`], [`vocab`])
//! - Payload decoding into named fields ([`decoder`], [`message`])
//! - Wide-integer normalization for lossless transport ([`normalize`])

pub mod crc;
pub mod decoder;
pub mod message;
pub mod normalize;
pub mod protocol;
pub mod schema;
pub mod splitter;
pub mod vocab;

#[cfg(test)]
pub(crate) mod testutil;
