//! # CRC-16/MCRF4XX Implementation
//!
//! CRC-16/MCRF4XX checksum calculation for MAVLink framing.
//!
//! **Polynomial**: 0x1021 reflected (0x8408)
//! **Initial Value**: 0xFFFF, no final inversion

/// Reflected CRC-16 polynomial
const CRC16_POLY: u16 = 0x8408;

/// Initial CRC accumulator value
const CRC16_INIT: u16 = 0xFFFF;

/// Precomputed CRC16 lookup table for fast calculation
const CRC16_TABLE: [u16; 256] = generate_crc16_table();

/// Generate CRC16 lookup table at compile time
const fn generate_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x0001) != 0 {
                crc = (crc >> 1) ^ CRC16_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC-16/MCRF4XX checksum using lookup table (fast)
///
/// # Arguments
///
/// * `data` - Bytes to checksum (everything after the sync byte, up to
///   the end of the payload)
///
/// # Returns
///
/// * `u16` - CRC16 checksum, transmitted little-endian on the wire
///
/// # Examples
///
/// ```
/// use mav_relay::mavlink::crc::crc16_mcrf4xx;
///
/// assert_eq!(crc16_mcrf4xx(b"123456789"), 0x6F91);
/// ```
pub fn crc16_mcrf4xx(data: &[u8]) -> u16 {
    let mut crc: u16 = CRC16_INIT;

    for &byte in data {
        crc = (crc >> 8) ^ CRC16_TABLE[((crc ^ byte as u16) & 0xFF) as usize];
    }

    crc
}

/// Bit-at-a-time CRC-16/MCRF4XX, kept as a cross-check for the table
/// implementation
#[allow(dead_code)]
fn crc16_mcrf4xx_slow(data: &[u8]) -> u16 {
    let mut crc: u16 = CRC16_INIT;

    for &byte in data {
        crc ^= byte as u16;

        for _ in 0..8 {
            if (crc & 0x0001) != 0 {
                crc = (crc >> 1) ^ CRC16_POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
