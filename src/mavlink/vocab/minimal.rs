//! `minimal` dialect: the handshake messages every MAVLink system speaks.

use crate::mavlink::schema::{FieldDef, FieldType::*, MessageSchema, Vocabulary};

pub const MINIMAL: Vocabulary = Vocabulary {
    name: "minimal",
    messages: &[
        MessageSchema {
            id: 0,
            name: "HEARTBEAT",
            fields: &[
                FieldDef::scalar("custom_mode", U32),
                FieldDef::scalar("type", U8),
                FieldDef::scalar("autopilot", U8),
                FieldDef::scalar("base_mode", U8),
                FieldDef::scalar("system_status", U8),
                FieldDef::scalar("mavlink_version", U8),
            ],
        },
        MessageSchema {
            id: 300,
            name: "PROTOCOL_VERSION",
            fields: &[
                FieldDef::scalar("version", U16),
                FieldDef::scalar("min_version", U16),
                FieldDef::scalar("max_version", U16),
                FieldDef::array("spec_version_hash", U8, 8),
                FieldDef::array("library_version_hash", U8, 8),
            ],
        },
    ],
};
