//! # Message Schema Registry
//!
//! Schema descriptions for MAVLink payloads and the registry that resolves
//! a message-type id to its schema.
//!
//! The registry is assembled exactly once at startup from an ordered list of
//! vocabularies and is read-only afterwards, so lookups need no locking and
//! the registry can be shared behind an `Arc`.

use std::collections::HashMap;

use super::vocab;

/// Primitive payload field types, little-endian on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
}

impl FieldType {
    /// Wire size of one element in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Char => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// True for integer types too wide for a lossless f64/JSON number
    pub const fn is_wide_integer(self) -> bool {
        matches!(self, Self::U64 | Self::I64)
    }
}

/// One field of a message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name as published to subscribers and the flight log
    pub name: &'static str,

    /// Element type
    pub kind: FieldType,

    /// Element count: 1 for scalars, >1 for arrays (`Char` arrays are strings)
    pub count: usize,
}

impl FieldDef {
    /// Define a scalar field
    pub const fn scalar(name: &'static str, kind: FieldType) -> Self {
        Self { name, kind, count: 1 }
    }

    /// Define an array field of `count` elements
    pub const fn array(name: &'static str, kind: FieldType, count: usize) -> Self {
        Self { name, kind, count }
    }

    /// Wire size of the whole field in bytes
    pub const fn wire_size(&self) -> usize {
        self.kind.size() * self.count
    }
}

/// Decoding schema for one message-type id
///
/// Fields are listed in MAVLink wire order: sorted by descending element
/// size, declaration order preserved within a size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSchema {
    /// Message-type id keying this schema in the registry
    pub id: u32,

    /// Message name (MAVLink dialect name, e.g. `HEARTBEAT`)
    pub name: &'static str,

    /// Ordered payload layout
    pub fields: &'static [FieldDef],
}

impl MessageSchema {
    /// Full payload size in bytes when no field is truncated away
    pub fn wire_len(&self) -> usize {
        self.fields.iter().map(|f| f.wire_size()).sum()
    }
}

/// A named collection of message schemas merged into the registry
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    /// Dialect name, used only for startup diagnostics
    pub name: &'static str,

    /// Schemas contributed by this vocabulary
    pub messages: &'static [MessageSchema],
}

/// Immutable id-to-schema mapping built once at startup
///
/// # Examples
///
/// ```
/// use mav_relay::mavlink::schema::SchemaRegistry;
///
/// let registry = SchemaRegistry::standard();
/// assert_eq!(registry.lookup(0).map(|s| s.name), Some("HEARTBEAT"));
/// assert!(registry.lookup(0xFFFF).is_none());
/// ```
#[derive(Debug)]
pub struct SchemaRegistry {
    entries: HashMap<u32, &'static MessageSchema>,
    vocabulary_names: Vec<&'static str>,
}

impl SchemaRegistry {
    /// Build a registry from an ordered vocabulary list
    ///
    /// Later vocabularies override earlier ones when a message-type id
    /// collides (deterministic, last wins).
    pub fn from_vocabularies(vocabularies: &[Vocabulary]) -> Self {
        let mut entries = HashMap::new();
        let mut vocabulary_names = Vec::with_capacity(vocabularies.len());

        for vocabulary in vocabularies {
            vocabulary_names.push(vocabulary.name);
            for message in vocabulary.messages {
                entries.insert(message.id, message);
            }
        }

        Self { entries, vocabulary_names }
    }

    /// Build the standard registry: `minimal` + `common` + `ardupilotmega`
    pub fn standard() -> Self {
        Self::from_vocabularies(&[vocab::MINIMAL, vocab::COMMON, vocab::ARDUPILOTMEGA])
    }

    /// Resolve a message-type id to its schema
    pub fn lookup(&self, message_id: u32) -> Option<&'static MessageSchema> {
        self.entries.get(&message_id).copied()
    }

    /// Number of registered message types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the registry holds no schemas
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the vocabularies the registry was built from, in merge order
    pub fn vocabulary_names(&self) -> &[&'static str] {
        &self.vocabulary_names
    }
}
