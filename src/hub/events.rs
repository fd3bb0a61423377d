//! # Control Channel Events
//!
//! JSON shapes exchanged with subscribers. Inbound events toggle the
//! transmission gate; the single outbound event wraps a decoded message.
//! Anything a subscriber sends that does not parse as a [`ControlEvent`]
//! is ignored, never answered.

use serde::{Deserialize, Serialize};

use crate::mavlink::message::DecodedMessage;

/// Inbound request from a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ControlEvent {
    /// `{"event":"start"}` opens the transmission gate
    Start,

    /// `{"event":"stop"}` closes it again
    Stop,
}

/// Outbound payload pushed to every subscriber
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundEvent<'a> {
    /// `{"event":"telemetryData","data":{...}}` with the ordered field map
    TelemetryData { data: &'a DecodedMessage },
}
