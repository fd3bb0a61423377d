//! # Decoded Message Model
//!
//! Structured form of a decoded MAVLink payload: an ordered field map plus
//! the frame header it came from.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// One decoded payload field value
///
/// Integers are widened to 64 bits; the schema keeps the wire width.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Unsigned integer field (u8 through u64 on the wire)
    UInt(u64),

    /// Signed integer field (i8 through i64 on the wire)
    Int(i64),

    /// Floating point field (f32 or f64 on the wire)
    Float(f64),

    /// Text field (`char[N]`, NUL-truncated) or a normalized wide integer
    Text(String),

    /// Array field of scalar elements
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Unsigned value, if this is a `UInt`
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Signed value, if this is an `Int`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Float value, if this is a `Float`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Text value, if this is a `Text`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::UInt(value) => serializer.serialize_u64(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

/// One fully decoded telemetry message
///
/// Fields keep the schema's declaration order; serialization emits them as a
/// flat JSON object in that order. Header metadata (message id, name, source
/// ids, sequence) rides along for diagnostics but is not serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    /// Message-type id from the frame header
    pub message_id: u32,

    /// Schema name, e.g. `HEARTBEAT`
    pub name: &'static str,

    /// Source system id from the frame header
    pub system_id: u8,

    /// Source component id from the frame header
    pub component_id: u8,

    /// Packet sequence number from the frame header
    pub sequence: u8,

    /// Decoded fields in schema order
    pub fields: Vec<(&'static str, FieldValue)>,
}

impl DecodedMessage {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for DecodedMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> DecodedMessage {
        DecodedMessage {
            message_id: 0,
            name: "HEARTBEAT",
            system_id: 1,
            component_id: 1,
            sequence: 42,
            fields: vec![
                ("custom_mode", FieldValue::UInt(0)),
                ("type", FieldValue::UInt(1)),
                ("autopilot", FieldValue::UInt(3)),
                ("base_mode", FieldValue::UInt(81)),
                ("system_status", FieldValue::UInt(4)),
                ("mavlink_version", FieldValue::UInt(3)),
            ],
        }
    }

    #[test]
    fn test_field_lookup() {
        let message = sample_message();
        assert_eq!(message.field("base_mode").and_then(FieldValue::as_u64), Some(81));
        assert!(message.field("missing").is_none());
    }

    #[test]
    fn test_serialize_preserves_field_order() {
        let message = sample_message();
        let json = serde_json::to_string(&message).unwrap();

        assert_eq!(
            json,
            r#"{"custom_mode":0,"type":1,"autopilot":3,"base_mode":81,"system_status":4,"mavlink_version":3}"#
        );
    }

    #[test]
    fn test_serialize_omits_header_metadata() {
        let message = sample_message();
        let json = serde_json::to_string(&message).unwrap();

        assert!(!json.contains("system_id"));
        assert!(!json.contains("sequence"));
        assert!(!json.contains("HEARTBEAT"));
    }

    #[test]
    fn test_serialize_value_kinds() {
        let message = DecodedMessage {
            message_id: 1,
            name: "SAMPLE",
            system_id: 1,
            component_id: 1,
            sequence: 0,
            fields: vec![
                ("count", FieldValue::Int(-5)),
                ("ratio", FieldValue::Float(2.5)),
                ("label", FieldValue::Text("ready".to_string())),
                (
                    "cells",
                    FieldValue::Array(vec![FieldValue::UInt(3700), FieldValue::UInt(3810)]),
                ),
            ],
        };

        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"count":-5,"ratio":2.5,"label":"ready","cells":[3700,3810]}"#
        );
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(FieldValue::UInt(7).as_u64(), Some(7));
        assert_eq!(FieldValue::UInt(7).as_i64(), None);
        assert_eq!(FieldValue::Int(-7).as_i64(), Some(-7));
        assert_eq!(FieldValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::Text("x".into()).as_str(), Some("x"));
    }
}
