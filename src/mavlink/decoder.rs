//! # Payload Decoder
//!
//! Decodes validated MAVLink frames into structured messages using the
//! schema registry.

use super::message::{DecodedMessage, FieldValue};
use super::protocol::{MavlinkVersion, RawFrame};
use super::schema::{FieldDef, FieldType, MessageSchema, SchemaRegistry};
use crate::error::{RelayError, Result};

/// Decode a validated frame against the registry
///
/// # Arguments
///
/// * `frame` - Checksum-validated frame from the splitter
/// * `registry` - Frozen schema registry
///
/// # Returns
///
/// * `Result<DecodedMessage>` - Decoded message with fields in schema order
///
/// # Errors
///
/// Returns `RelayError::UnknownMessage` when the message-type id has no
/// schema (expected for out-of-vocabulary traffic), or `RelayError::Protocol`
/// when a field runs past the available payload bytes.
pub fn decode(frame: &RawFrame, registry: &SchemaRegistry) -> Result<DecodedMessage> {
    let schema = registry
        .lookup(frame.message_id)
        .ok_or(RelayError::UnknownMessage(frame.message_id))?;

    decode_with(frame, schema)
}

/// Decode a validated frame against an already-resolved schema
///
/// Decoding is pure: identical frame bytes always produce an identical
/// message. v2 payloads arrive with trailing zero bytes truncated, so fields
/// past the declared length decode as zero; v1 payloads must cover every
/// field or the frame is rejected. Payload bytes beyond the schema's wire
/// length are ignored.
pub fn decode_with(frame: &RawFrame, schema: &'static MessageSchema) -> Result<DecodedMessage> {
    let zero_extend = frame.version == MavlinkVersion::V2;
    let mut cursor = PayloadCursor::new(&frame.payload, zero_extend);

    let mut fields = Vec::with_capacity(schema.fields.len());
    for field in schema.fields {
        let value = decode_field(&mut cursor, field).ok_or_else(|| {
            RelayError::Protocol(format!(
                "{}: field '{}' truncated (payload {} bytes, schema {} bytes)",
                schema.name,
                field.name,
                frame.payload_len(),
                schema.wire_len()
            ))
        })?;
        fields.push((field.name, value));
    }

    Ok(DecodedMessage {
        message_id: frame.message_id,
        name: schema.name,
        system_id: frame.system_id,
        component_id: frame.component_id,
        sequence: frame.sequence,
        fields,
    })
}

/// Byte cursor over a payload, optionally zero-extending past the end
struct PayloadCursor<'a> {
    data: &'a [u8],
    position: usize,
    zero_extend: bool,
}

impl<'a> PayloadCursor<'a> {
    fn new(data: &'a [u8], zero_extend: bool) -> Self {
        Self { data, position: 0, zero_extend }
    }

    /// Take the next `N` bytes, zero-filling the tail in v2 mode
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let mut bytes = [0u8; N];
        let available = self.data.len().saturating_sub(self.position).min(N);

        if available < N && !self.zero_extend {
            return None;
        }

        bytes[..available].copy_from_slice(&self.data[self.position..self.position + available]);
        self.position += N;
        Some(bytes)
    }

    /// Take the next `count` bytes, zero-filling the tail in v2 mode
    fn take_bytes(&mut self, count: usize) -> Option<Vec<u8>> {
        let mut bytes = vec![0u8; count];
        let available = self.data.len().saturating_sub(self.position).min(count);

        if available < count && !self.zero_extend {
            return None;
        }

        bytes[..available].copy_from_slice(&self.data[self.position..self.position + available]);
        self.position += count;
        Some(bytes)
    }
}

fn decode_field(cursor: &mut PayloadCursor<'_>, field: &FieldDef) -> Option<FieldValue> {
    if field.kind == FieldType::Char {
        let bytes = cursor.take_bytes(field.count)?;
        return Some(FieldValue::Text(text_from_bytes(&bytes)));
    }

    if field.count == 1 {
        return decode_scalar(cursor, field.kind);
    }

    let mut elements = Vec::with_capacity(field.count);
    for _ in 0..field.count {
        elements.push(decode_scalar(cursor, field.kind)?);
    }
    Some(FieldValue::Array(elements))
}

fn decode_scalar(cursor: &mut PayloadCursor<'_>, kind: FieldType) -> Option<FieldValue> {
    let value = match kind {
        FieldType::U8 => FieldValue::UInt(u8::from_le_bytes(cursor.take()?) as u64),
        FieldType::U16 => FieldValue::UInt(u16::from_le_bytes(cursor.take()?) as u64),
        FieldType::U32 => FieldValue::UInt(u32::from_le_bytes(cursor.take()?) as u64),
        FieldType::U64 => FieldValue::UInt(u64::from_le_bytes(cursor.take()?)),
        FieldType::I8 => FieldValue::Int(i8::from_le_bytes(cursor.take()?) as i64),
        FieldType::I16 => FieldValue::Int(i16::from_le_bytes(cursor.take()?) as i64),
        FieldType::I32 => FieldValue::Int(i32::from_le_bytes(cursor.take()?) as i64),
        FieldType::I64 => FieldValue::Int(i64::from_le_bytes(cursor.take()?)),
        FieldType::F32 => FieldValue::Float(f32::from_le_bytes(cursor.take()?) as f64),
        FieldType::F64 => FieldValue::Float(f64::from_le_bytes(cursor.take()?)),
        FieldType::Char => FieldValue::Text(text_from_bytes(&cursor.take::<1>()?)),
    };

    Some(value)
}

/// Interpret a `char[N]` field as text, truncated at the first NUL
fn text_from_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
