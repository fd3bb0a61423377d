//! # MAV Relay Library
//!
//! Relay MAVLink flight-controller telemetry from a serial link to
//! WebSocket subscribers.
//!
//! This library provides the core functionality for splitting, decoding and
//! fanning out MAVLink telemetry: frames are validated and decoded against
//! a built-in schema registry, gated on subscriber demand, broadcast as
//! JSON events, and appended to per-day flight logs.

pub mod config;
pub mod error;
pub mod flightlog;
pub mod hub;
pub mod mavlink;
pub mod relay;
pub mod serial;
