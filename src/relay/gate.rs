//! # Transmission Gate
//!
//! Controls whether decoded telemetry leaves the relay. Subscribers toggle
//! it over the control channel; while the gate is idle every decoded
//! message is discarded before it reaches the hub or the flight log.

/// Requested gate transition, as received from the control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCommand {
    Start,
    Stop,
}

/// Current gate position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Telemetry is decoded but discarded
    #[default]
    Idle,

    /// Telemetry flows to subscribers and the flight log
    Transmitting,
}

/// Two-state toggle, always starting idle
///
/// Transitions are idempotent: a repeated command leaves the state
/// unchanged and reports whether anything actually moved.
#[derive(Debug, Default)]
pub struct TransmissionGate {
    state: GateState,
}

impl TransmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command, returning `true` if the state changed
    pub fn apply(&mut self, command: GateCommand) -> bool {
        let next = match command {
            GateCommand::Start => GateState::Transmitting,
            GateCommand::Stop => GateState::Idle,
        };

        let changed = self.state != next;
        self.state = next;
        changed
    }

    pub fn is_transmitting(&self) -> bool {
        self.state == GateState::Transmitting
    }

    pub fn state(&self) -> GateState {
        self.state
    }
}
