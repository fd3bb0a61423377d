//! `common` dialect: the cross-autopilot telemetry set.

use crate::mavlink::schema::{FieldDef, FieldType::*, MessageSchema, Vocabulary};

pub const COMMON: Vocabulary = Vocabulary {
    name: "common",
    messages: &[
        MessageSchema {
            id: 1,
            name: "SYS_STATUS",
            fields: &[
                FieldDef::scalar("onboard_control_sensors_present", U32),
                FieldDef::scalar("onboard_control_sensors_enabled", U32),
                FieldDef::scalar("onboard_control_sensors_health", U32),
                FieldDef::scalar("load", U16),
                FieldDef::scalar("voltage_battery", U16),
                FieldDef::scalar("current_battery", I16),
                FieldDef::scalar("drop_rate_comm", U16),
                FieldDef::scalar("errors_comm", U16),
                FieldDef::scalar("errors_count1", U16),
                FieldDef::scalar("errors_count2", U16),
                FieldDef::scalar("errors_count3", U16),
                FieldDef::scalar("errors_count4", U16),
                FieldDef::scalar("battery_remaining", I8),
            ],
        },
        MessageSchema {
            id: 2,
            name: "SYSTEM_TIME",
            fields: &[
                FieldDef::scalar("time_unix_usec", U64),
                FieldDef::scalar("time_boot_ms", U32),
            ],
        },
        MessageSchema {
            id: 4,
            name: "PING",
            fields: &[
                FieldDef::scalar("time_usec", U64),
                FieldDef::scalar("seq", U32),
                FieldDef::scalar("target_system", U8),
                FieldDef::scalar("target_component", U8),
            ],
        },
        MessageSchema {
            id: 24,
            name: "GPS_RAW_INT",
            fields: &[
                FieldDef::scalar("time_usec", U64),
                FieldDef::scalar("lat", I32),
                FieldDef::scalar("lon", I32),
                FieldDef::scalar("alt", I32),
                FieldDef::scalar("eph", U16),
                FieldDef::scalar("epv", U16),
                FieldDef::scalar("vel", U16),
                FieldDef::scalar("cog", U16),
                FieldDef::scalar("fix_type", U8),
                FieldDef::scalar("satellites_visible", U8),
            ],
        },
        MessageSchema {
            id: 30,
            name: "ATTITUDE",
            fields: &[
                FieldDef::scalar("time_boot_ms", U32),
                FieldDef::scalar("roll", F32),
                FieldDef::scalar("pitch", F32),
                FieldDef::scalar("yaw", F32),
                FieldDef::scalar("rollspeed", F32),
                FieldDef::scalar("pitchspeed", F32),
                FieldDef::scalar("yawspeed", F32),
            ],
        },
        MessageSchema {
            id: 33,
            name: "GLOBAL_POSITION_INT",
            fields: &[
                FieldDef::scalar("time_boot_ms", U32),
                FieldDef::scalar("lat", I32),
                FieldDef::scalar("lon", I32),
                FieldDef::scalar("alt", I32),
                FieldDef::scalar("relative_alt", I32),
                FieldDef::scalar("vx", I16),
                FieldDef::scalar("vy", I16),
                FieldDef::scalar("vz", I16),
                FieldDef::scalar("hdg", U16),
            ],
        },
        MessageSchema {
            id: 74,
            name: "VFR_HUD",
            fields: &[
                FieldDef::scalar("airspeed", F32),
                FieldDef::scalar("groundspeed", F32),
                FieldDef::scalar("alt", F32),
                FieldDef::scalar("climb", F32),
                FieldDef::scalar("heading", I16),
                FieldDef::scalar("throttle", U16),
            ],
        },
        MessageSchema {
            id: 111,
            name: "TIMESYNC",
            fields: &[
                FieldDef::scalar("tc1", I64),
                FieldDef::scalar("ts1", I64),
            ],
        },
        MessageSchema {
            id: 147,
            name: "BATTERY_STATUS",
            fields: &[
                FieldDef::scalar("current_consumed", I32),
                FieldDef::scalar("energy_consumed", I32),
                FieldDef::scalar("temperature", I16),
                FieldDef::array("voltages", U16, 10),
                FieldDef::scalar("current_battery", I16),
                FieldDef::scalar("id", U8),
                FieldDef::scalar("battery_function", U8),
                FieldDef::scalar("type", U8),
                FieldDef::scalar("battery_remaining", I8),
            ],
        },
        MessageSchema {
            id: 253,
            name: "STATUSTEXT",
            fields: &[
                FieldDef::scalar("severity", U8),
                FieldDef::array("text", Char, 50),
            ],
        },
    ],
};
