//! # Frame Splitter
//!
//! Lifts checksum-validated frames out of an unbounded, untrusted serial
//! byte stream arriving in arbitrary chunk boundaries.
//!
//! Corrupt input never stalls the stream: on a checksum mismatch or an
//! unsupported frame the splitter advances one byte past the sync byte and
//! rescans, so a real frame embedded after garbage is still recovered.
//! Frames come out strictly in arrival order and are never emitted twice.

use bytes::BytesMut;

use super::crc::crc16_mcrf4xx;
use super::protocol::{
    MavlinkVersion, RawFrame, MAVLINK_CHECKSUM_SIZE, MAVLINK_V2_FLAG_SIGNED,
    MAVLINK_V2_SIGNATURE_SIZE,
};

/// Initial capacity of the accumulation buffer
const RECEIVE_BUFFER_CAPACITY: usize = 1024;

/// Diagnostic counters, maintained across the splitter's lifetime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitterStats {
    /// Validated frames emitted
    pub frames: u64,

    /// Candidate frames dropped on checksum mismatch
    pub crc_failures: u64,

    /// Bytes skipped while hunting for a sync byte (noise, corrupt frames)
    pub discarded_bytes: u64,
}

/// Incremental splitter accumulating bytes until whole frames are available
///
/// # Examples
///
/// ```
/// use mav_relay::mavlink::splitter::FrameSplitter;
///
/// let mut splitter = FrameSplitter::new();
/// splitter.push(&[0x12, 0x34]); // noise with no sync byte
/// assert!(splitter.next_frame().is_none());
/// assert_eq!(splitter.stats().discarded_bytes, 2);
/// ```
#[derive(Debug)]
pub struct FrameSplitter {
    buffer: BytesMut,
    stats: SplitterStats,
}

impl FrameSplitter {
    /// Create a splitter with an empty buffer
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(RECEIVE_BUFFER_CAPACITY),
            stats: SplitterStats::default(),
        }
    }

    /// Append a chunk of received bytes
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Extract the next complete, checksum-valid frame
    ///
    /// Returns `None` when the buffered bytes hold no complete frame yet;
    /// push more bytes and call again. Invalid candidates are consumed
    /// internally and only show up in [`SplitterStats`].
    pub fn next_frame(&mut self) -> Option<RawFrame> {
        loop {
            let version = self.seek_sync()?;
            let header_size = version.header_size();

            if self.buffer.len() < header_size {
                return None;
            }

            let payload_len = self.buffer[1] as usize;

            let mut signed = false;
            if version == MavlinkVersion::V2 {
                let incompat = self.buffer[2];
                if incompat & !MAVLINK_V2_FLAG_SIGNED != 0 {
                    // Unknown incompatibility flags mean we cannot trust the
                    // frame layout; skip the sync byte and rescan
                    self.discard(1);
                    continue;
                }
                signed = incompat & MAVLINK_V2_FLAG_SIGNED != 0;
            }

            let signature_len = if signed { MAVLINK_V2_SIGNATURE_SIZE } else { 0 };
            let frame_len = header_size + payload_len + MAVLINK_CHECKSUM_SIZE + signature_len;

            if self.buffer.len() < frame_len {
                return None;
            }

            let crc_offset = header_size + payload_len;
            let computed = crc16_mcrf4xx(&self.buffer[1..crc_offset]);
            let received =
                u16::from_le_bytes([self.buffer[crc_offset], self.buffer[crc_offset + 1]]);

            if computed != received {
                self.stats.crc_failures += 1;
                self.discard(1);
                continue;
            }

            let frame = self.consume_frame(version, header_size, payload_len, frame_len, received, signed);
            self.stats.frames += 1;
            return Some(frame);
        }
    }

    /// Cumulative diagnostic counters
    pub fn stats(&self) -> SplitterStats {
        self.stats
    }

    /// Bytes currently buffered awaiting frame completion
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop bytes until the buffer starts at a sync byte
    ///
    /// Returns the framing revision of that sync byte, or `None` after
    /// draining a buffer that held no sync byte at all.
    fn seek_sync(&mut self) -> Option<MavlinkVersion> {
        let position = self
            .buffer
            .iter()
            .position(|&byte| MavlinkVersion::from_sync_byte(byte).is_some());

        match position {
            Some(0) => {}
            Some(skip) => self.discard(skip),
            None => {
                let len = self.buffer.len();
                if len > 0 {
                    self.discard(len);
                }
                return None;
            }
        }

        MavlinkVersion::from_sync_byte(self.buffer[0])
    }

    fn discard(&mut self, count: usize) {
        let _ = self.buffer.split_to(count);
        self.stats.discarded_bytes += count as u64;
    }

    fn consume_frame(
        &mut self,
        version: MavlinkVersion,
        header_size: usize,
        payload_len: usize,
        frame_len: usize,
        checksum: u16,
        signed: bool,
    ) -> RawFrame {
        let consumed = self.buffer.split_to(frame_len).freeze();
        let payload = consumed.slice(header_size..header_size + payload_len);

        let (sequence, system_id, component_id, message_id) = match version {
            MavlinkVersion::V1 => (consumed[2], consumed[3], consumed[4], consumed[5] as u32),
            MavlinkVersion::V2 => (
                consumed[4],
                consumed[5],
                consumed[6],
                u32::from_le_bytes([consumed[7], consumed[8], consumed[9], 0]),
            ),
        };

        RawFrame {
            version,
            sequence,
            system_id,
            component_id,
            message_id,
            payload,
            checksum,
            signed,
        }
    }
}

impl Default for FrameSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mavlink::protocol::{MAVLINK_V1_STX, MAVLINK_V2_STX};
    use crate::mavlink::testutil::{encode_v1, encode_v2, heartbeat_payload};

    #[test]
    fn test_single_v1_frame() {
        let mut splitter = FrameSplitter::new();
        splitter.push(&encode_v1(7, 1, 1, 0, &heartbeat_payload()));

        let frame = splitter.next_frame().expect("frame should be complete");
        assert_eq!(frame.version, MavlinkVersion::V1);
        assert_eq!(frame.sequence, 7);
        assert_eq!(frame.system_id, 1);
        assert_eq!(frame.component_id, 1);
        assert_eq!(frame.message_id, 0);
        assert_eq!(frame.payload_len(), 9);
        assert!(!frame.signed);

        assert!(splitter.next_frame().is_none());
        assert_eq!(splitter.stats().frames, 1);
        assert_eq!(splitter.buffered(), 0);
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let encoded = encode_v1(0, 1, 1, 0, &heartbeat_payload());
        let mut splitter = FrameSplitter::new();

        for &byte in &encoded[..encoded.len() - 1] {
            splitter.push(&[byte]);
            assert!(splitter.next_frame().is_none());
        }

        splitter.push(&[encoded[encoded.len() - 1]]);
        let frame = splitter.next_frame().expect("last byte completes the frame");
        assert_eq!(frame.message_id, 0);
    }

    #[test]
    fn test_noise_before_sync_is_skipped() {
        let mut stream = vec![0x00, 0x42, 0x99];
        stream.extend_from_slice(&encode_v1(1, 1, 1, 0, &heartbeat_payload()));

        let mut splitter = FrameSplitter::new();
        splitter.push(&stream);

        let frame = splitter.next_frame().expect("frame after noise");
        assert_eq!(frame.sequence, 1);
        assert_eq!(splitter.stats().discarded_bytes, 3);
    }

    #[test]
    fn test_pure_noise_drains_buffer() {
        let mut splitter = FrameSplitter::new();
        splitter.push(&[0x11; 64]);

        assert!(splitter.next_frame().is_none());
        assert_eq!(splitter.stats().discarded_bytes, 64);
        assert_eq!(splitter.buffered(), 0);
    }

    #[test]
    fn test_corrupt_checksum_dropped_then_resync() {
        let mut corrupted = encode_v1(3, 1, 1, 0, &heartbeat_payload());
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;

        let mut stream = corrupted;
        stream.extend_from_slice(&encode_v1(4, 1, 1, 0, &heartbeat_payload()));

        let mut splitter = FrameSplitter::new();
        splitter.push(&stream);

        let frame = splitter.next_frame().expect("valid frame after corrupt one");
        assert_eq!(frame.sequence, 4);
        assert!(splitter.next_frame().is_none());

        let stats = splitter.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.crc_failures, 1);
        assert!(stats.discarded_bytes > 0);
    }

    #[test]
    fn test_corrupt_payload_dropped() {
        let mut corrupted = encode_v1(3, 1, 1, 0, &heartbeat_payload());
        corrupted[8] ^= 0x55; // flip a payload byte, checksum now stale

        let mut splitter = FrameSplitter::new();
        splitter.push(&corrupted);

        assert!(splitter.next_frame().is_none());
        assert_eq!(splitter.stats().crc_failures, 1);
        assert_eq!(splitter.stats().frames, 0);
    }

    #[test]
    fn test_two_frames_in_one_push_stay_ordered() {
        let mut stream = encode_v1(10, 1, 1, 0, &heartbeat_payload());
        stream.extend_from_slice(&encode_v1(11, 1, 1, 0, &heartbeat_payload()));

        let mut splitter = FrameSplitter::new();
        splitter.push(&stream);

        assert_eq!(splitter.next_frame().map(|f| f.sequence), Some(10));
        assert_eq!(splitter.next_frame().map(|f| f.sequence), Some(11));
        assert!(splitter.next_frame().is_none());
        assert_eq!(splitter.stats().frames, 2);
    }

    #[test]
    fn test_sync_bytes_inside_payload() {
        // A payload full of sync-byte values must not derail parsing
        let payload = [MAVLINK_V1_STX, MAVLINK_V2_STX, MAVLINK_V1_STX, 0xFF];
        let mut splitter = FrameSplitter::new();
        splitter.push(&encode_v1(9, 1, 1, 111, &payload));

        let frame = splitter.next_frame().expect("frame should parse");
        assert_eq!(frame.message_id, 111);
        assert_eq!(&frame.payload[..], &payload);
    }

    #[test]
    fn test_v2_frame_with_wide_message_id() {
        let payload = [0x01, 0x02, 0x03];
        let mut splitter = FrameSplitter::new();
        splitter.push(&encode_v2(5, 1, 1, 300, &payload, false));

        let frame = splitter.next_frame().expect("v2 frame");
        assert_eq!(frame.version, MavlinkVersion::V2);
        assert_eq!(frame.message_id, 300);
        assert_eq!(frame.sequence, 5);
        assert_eq!(&frame.payload[..], &payload);
    }

    #[test]
    fn test_v2_signed_frame_consumes_signature() {
        let mut stream = encode_v2(1, 1, 1, 0, &heartbeat_payload(), true);
        stream.extend_from_slice(&encode_v1(2, 1, 1, 0, &heartbeat_payload()));

        let mut splitter = FrameSplitter::new();
        splitter.push(&stream);

        let signed = splitter.next_frame().expect("signed frame");
        assert!(signed.signed);
        assert_eq!(signed.sequence, 1);

        let following = splitter.next_frame().expect("frame after signature");
        assert_eq!(following.sequence, 2);
        assert_eq!(splitter.buffered(), 0);
    }

    #[test]
    fn test_v2_unknown_incompat_flags_dropped() {
        let mut bad = encode_v2(1, 1, 1, 0, &heartbeat_payload(), false);
        bad[2] = 0x02; // unsupported incompat flag
        bad.extend_from_slice(&encode_v1(6, 1, 1, 0, &heartbeat_payload()));

        let mut splitter = FrameSplitter::new();
        splitter.push(&bad);

        let frame = splitter.next_frame().expect("good frame after dropped one");
        assert_eq!(frame.sequence, 6);
        assert_eq!(splitter.stats().frames, 1);
    }

    #[test]
    fn test_v2_truncated_payload_passes_through() {
        // v2 senders strip trailing zero bytes; the splitter only honors the
        // declared length and leaves reconstruction to the decoder
        let mut splitter = FrameSplitter::new();
        splitter.push(&encode_v2(0, 1, 1, 2, &[0x15], false));

        let frame = splitter.next_frame().expect("short v2 frame");
        assert_eq!(frame.message_id, 2);
        assert_eq!(frame.payload_len(), 1);
    }

    #[test]
    fn test_incomplete_frame_waits_for_more_bytes() {
        let encoded = encode_v1(0, 1, 1, 0, &heartbeat_payload());
        let (head, tail) = encoded.split_at(8);

        let mut splitter = FrameSplitter::new();
        splitter.push(head);
        assert!(splitter.next_frame().is_none());
        assert_eq!(splitter.buffered(), 8);

        splitter.push(tail);
        assert!(splitter.next_frame().is_some());
    }

    #[test]
    fn test_empty_payload_frame() {
        let mut splitter = FrameSplitter::new();
        splitter.push(&encode_v1(0, 1, 1, 152, &[]));

        let frame = splitter.next_frame().expect("zero-length payload frame");
        assert_eq!(frame.message_id, 152);
        assert_eq!(frame.payload_len(), 0);
    }

    #[test]
    fn test_checksum_recorded_on_frame() {
        let encoded = encode_v1(0, 1, 1, 0, &heartbeat_payload());
        let expected = u16::from_le_bytes([encoded[encoded.len() - 2], encoded[encoded.len() - 1]]);

        let mut splitter = FrameSplitter::new();
        splitter.push(&encoded);

        let frame = splitter.next_frame().unwrap();
        assert_eq!(frame.checksum, expected);
    }
}
