//! # Vocabulary Tables
//!
//! Static schema tables for the MAVLink dialects this relay understands.
//! The registry merges them in order, later dialects winning on id collision:
//!
//! | Vocabulary        | Messages                                              |
//! |-------------------|-------------------------------------------------------|
//! | `minimal`         | HEARTBEAT, PROTOCOL_VERSION                           |
//! | `common`          | status, time, position, attitude and text telemetry   |
//! | `ardupilotmega`   | ArduPilot-specific sensor telemetry                   |
//!
//! Field layouts follow MAVLink wire order (descending element size, stable
//! within a size class) with little-endian scalars. Field names are the
//! dialect XML names verbatim.

pub mod ardupilotmega;
pub mod common;
pub mod minimal;

pub use ardupilotmega::ARDUPILOTMEGA;
pub use common::COMMON;
pub use minimal::MINIMAL;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mavlink::schema::Vocabulary;

    const ALL: [Vocabulary; 3] = [MINIMAL, COMMON, ARDUPILOTMEGA];

    #[test]
    fn test_wire_order_is_descending_by_element_size() {
        for vocabulary in ALL {
            for message in vocabulary.messages {
                let mut previous = usize::MAX;
                for field in message.fields {
                    assert!(
                        field.kind.size() <= previous,
                        "{}: field {} out of wire order",
                        message.name,
                        field.name
                    );
                    previous = field.kind.size();
                }
            }
        }
    }

    #[test]
    fn test_field_names_unique_within_message() {
        for vocabulary in ALL {
            for message in vocabulary.messages {
                for (i, field) in message.fields.iter().enumerate() {
                    for other in &message.fields[i + 1..] {
                        assert_ne!(
                            field.name, other.name,
                            "{}: duplicate field name",
                            message.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_ids_unique_within_vocabulary() {
        for vocabulary in ALL {
            for (i, message) in vocabulary.messages.iter().enumerate() {
                for other in &vocabulary.messages[i + 1..] {
                    assert_ne!(
                        message.id, other.id,
                        "{}: duplicate id {}",
                        vocabulary.name, message.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_payloads_fit_length_byte() {
        for vocabulary in ALL {
            for message in vocabulary.messages {
                assert!(
                    message.wire_len() <= crate::mavlink::protocol::MAVLINK_MAX_PAYLOAD_SIZE,
                    "{}: payload too large",
                    message.name
                );
            }
        }
    }
}
