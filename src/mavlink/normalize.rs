//! # Wide Integer Normalization
//!
//! Rewrites 64-bit integer fields as exact base-10 strings before a message
//! reaches JSON transport and logging. JSON numbers are f64s and lose
//! precision past 2^53, so wide integers travel as text end-to-end;
//! consumers needing the integer parse the string back.

use super::message::{DecodedMessage, FieldValue};
use super::schema::MessageSchema;

/// Normalize a freshly decoded message in place
///
/// Every field whose schema type is a 64-bit integer (scalar or array) is
/// replaced with its decimal string form. All other fields pass through
/// unchanged. Applied exactly once, between decode and the gate check.
pub fn apply(schema: &MessageSchema, message: &mut DecodedMessage) {
    debug_assert_eq!(schema.fields.len(), message.fields.len());

    for (field, (_, value)) in schema.fields.iter().zip(message.fields.iter_mut()) {
        if field.kind.is_wide_integer() {
            stringify(value);
        }
    }
}

fn stringify(value: &mut FieldValue) {
    match value {
        FieldValue::UInt(wide) => *value = FieldValue::Text(wide.to_string()),
        FieldValue::Int(wide) => *value = FieldValue::Text(wide.to_string()),
        FieldValue::Array(elements) => {
            for element in elements {
                stringify(element);
            }
        }
        FieldValue::Float(_) | FieldValue::Text(_) => {}
    }
}
