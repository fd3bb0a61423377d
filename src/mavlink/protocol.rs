//! # MAVLink Framing Constants and Types
//!
//! Core wire-level definitions for the MAVLink serial protocol.

use bytes::Bytes;

/// MAVLink v1 frame sync byte
pub const MAVLINK_V1_STX: u8 = 0xFE;

/// MAVLink v2 frame sync byte
pub const MAVLINK_V2_STX: u8 = 0xFD;

/// MAVLink v1 header size including the sync byte
/// Frame structure: stx(1) + len(1) + seq(1) + sysid(1) + compid(1) + msgid(1)
pub const MAVLINK_V1_HEADER_SIZE: usize = 6;

/// MAVLink v2 header size including the sync byte
/// Frame structure: stx(1) + len(1) + incompat(1) + compat(1) + seq(1)
/// + sysid(1) + compid(1) + msgid(3, little-endian)
pub const MAVLINK_V2_HEADER_SIZE: usize = 10;

/// Checksum trailer size (CRC-16, little-endian)
pub const MAVLINK_CHECKSUM_SIZE: usize = 2;

/// v2 signature trailer size, present when the signed incompat flag is set
pub const MAVLINK_V2_SIGNATURE_SIZE: usize = 13;

/// v2 incompatibility flag marking a signed frame
pub const MAVLINK_V2_FLAG_SIGNED: u8 = 0x01;

/// Maximum payload size (the length field is a single byte)
pub const MAVLINK_MAX_PAYLOAD_SIZE: usize = 255;

/// MAVLink framing revision, distinguished by the sync byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MavlinkVersion {
    V1,
    V2,
}

impl MavlinkVersion {
    /// Map a sync byte to a framing revision
    pub fn from_sync_byte(byte: u8) -> Option<Self> {
        match byte {
            MAVLINK_V1_STX => Some(Self::V1),
            MAVLINK_V2_STX => Some(Self::V2),
            _ => None,
        }
    }

    /// Sync byte opening a frame of this revision
    pub fn sync_byte(self) -> u8 {
        match self {
            Self::V1 => MAVLINK_V1_STX,
            Self::V2 => MAVLINK_V2_STX,
        }
    }

    /// Header size including the sync byte
    pub fn header_size(self) -> usize {
        match self {
            Self::V1 => MAVLINK_V1_HEADER_SIZE,
            Self::V2 => MAVLINK_V2_HEADER_SIZE,
        }
    }
}

/// One checksum-validated frame lifted out of the serial byte stream
///
/// Produced by the frame splitter and consumed immediately by the decoder;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Framing revision the frame arrived in
    pub version: MavlinkVersion,

    /// Sender's wrapping packet sequence number
    pub sequence: u8,

    /// Source system id (vehicle)
    pub system_id: u8,

    /// Source component id (autopilot, gimbal, ...)
    pub component_id: u8,

    /// Message-type id (one byte in v1, three bytes in v2)
    pub message_id: u32,

    /// Payload bytes as declared by the length field
    pub payload: Bytes,

    /// Received CRC-16 checksum, already validated by the splitter
    pub checksum: u16,

    /// Whether the frame carried a v2 signature trailer (consumed, not verified)
    pub signed: bool,
}

impl RawFrame {
    /// Declared payload length in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_bytes() {
        assert_eq!(MAVLINK_V1_STX, 0xFE);
        assert_eq!(MAVLINK_V2_STX, 0xFD);
        assert_eq!(MavlinkVersion::V1.sync_byte(), MAVLINK_V1_STX);
        assert_eq!(MavlinkVersion::V2.sync_byte(), MAVLINK_V2_STX);
    }

    #[test]
    fn test_header_sizes() {
        assert_eq!(MavlinkVersion::V1.header_size(), 6);
        assert_eq!(MavlinkVersion::V2.header_size(), 10);
        assert_eq!(MAVLINK_CHECKSUM_SIZE, 2);
        assert_eq!(MAVLINK_V2_SIGNATURE_SIZE, 13);
    }

    #[test]
    fn test_version_from_sync_byte() {
        assert_eq!(MavlinkVersion::from_sync_byte(0xFE), Some(MavlinkVersion::V1));
        assert_eq!(MavlinkVersion::from_sync_byte(0xFD), Some(MavlinkVersion::V2));
        assert_eq!(MavlinkVersion::from_sync_byte(0xC8), None);
        assert_eq!(MavlinkVersion::from_sync_byte(0x00), None);
    }

    #[test]
    fn test_raw_frame_payload_len() {
        let frame = RawFrame {
            version: MavlinkVersion::V1,
            sequence: 7,
            system_id: 1,
            component_id: 1,
            message_id: 0,
            payload: Bytes::from_static(&[0u8; 9]),
            checksum: 0xBEEF,
            signed: false,
        };

        assert_eq!(frame.payload_len(), 9);
        assert_eq!(frame.sequence, 7);
    }
}
