//! `ardupilotmega` dialect: ArduPilot-specific sensor telemetry.

use crate::mavlink::schema::{FieldDef, FieldType::*, MessageSchema, Vocabulary};

pub const ARDUPILOTMEGA: Vocabulary = Vocabulary {
    name: "ardupilotmega",
    messages: &[
        MessageSchema {
            id: 152,
            name: "MEMINFO",
            fields: &[
                FieldDef::scalar("brkval", U16),
                FieldDef::scalar("freemem", U16),
            ],
        },
        MessageSchema {
            id: 163,
            name: "AHRS",
            fields: &[
                FieldDef::scalar("omegaIx", F32),
                FieldDef::scalar("omegaIy", F32),
                FieldDef::scalar("omegaIz", F32),
                FieldDef::scalar("accel_weight", F32),
                FieldDef::scalar("renorm_val", F32),
                FieldDef::scalar("error_rp", F32),
                FieldDef::scalar("error_yaw", F32),
            ],
        },
        MessageSchema {
            id: 165,
            name: "HWSTATUS",
            fields: &[
                FieldDef::scalar("Vcc", U16),
                FieldDef::scalar("I2Cerr", U8),
            ],
        },
        MessageSchema {
            id: 168,
            name: "WIND",
            fields: &[
                FieldDef::scalar("direction", F32),
                FieldDef::scalar("speed", F32),
                FieldDef::scalar("speed_z", F32),
            ],
        },
        MessageSchema {
            id: 173,
            name: "RANGEFINDER",
            fields: &[
                FieldDef::scalar("distance", F32),
                FieldDef::scalar("voltage", F32),
            ],
        },
    ],
};
