//! Wire-frame builders shared by unit tests

use super::crc::crc16_mcrf4xx;
use super::protocol::{
    MAVLINK_V1_STX, MAVLINK_V2_FLAG_SIGNED, MAVLINK_V2_SIGNATURE_SIZE, MAVLINK_V2_STX,
};

/// Encode a complete v1 frame around the given payload
pub(crate) fn encode_v1(
    sequence: u8,
    system_id: u8,
    component_id: u8,
    message_id: u8,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = vec![
        MAVLINK_V1_STX,
        payload.len() as u8,
        sequence,
        system_id,
        component_id,
        message_id,
    ];
    frame.extend_from_slice(payload);

    let checksum = crc16_mcrf4xx(&frame[1..]);
    frame.extend_from_slice(&checksum.to_le_bytes());
    frame
}

/// Encode a complete v2 frame, optionally carrying an (all-zero) signature
pub(crate) fn encode_v2(
    sequence: u8,
    system_id: u8,
    component_id: u8,
    message_id: u32,
    payload: &[u8],
    signed: bool,
) -> Vec<u8> {
    let incompat_flags = if signed { MAVLINK_V2_FLAG_SIGNED } else { 0 };
    let id = message_id.to_le_bytes();

    let mut frame = vec![
        MAVLINK_V2_STX,
        payload.len() as u8,
        incompat_flags,
        0, // compat flags
        sequence,
        system_id,
        component_id,
        id[0],
        id[1],
        id[2],
    ];
    frame.extend_from_slice(payload);

    let checksum = crc16_mcrf4xx(&frame[1..]);
    frame.extend_from_slice(&checksum.to_le_bytes());

    if signed {
        frame.extend_from_slice(&[0u8; MAVLINK_V2_SIGNATURE_SIZE]);
    }
    frame
}

/// HEARTBEAT payload: custom_mode 0, type 1, autopilot 3, base_mode 0x51,
/// system_status 4, mavlink_version 3
pub(crate) fn heartbeat_payload() -> Vec<u8> {
    vec![0, 0, 0, 0, 1, 3, 0x51, 4, 3]
}
