//! Packet field type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive types a packet format file may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// 32-bit signed integer (`s32`)
    Signed32,
    /// 32-bit unsigned integer (`u32`)
    Unsigned32,
    /// 32-bit IEEE-754 float (`f32`)
    Float32,
    /// 16-bit unsigned integer (`u16`)
    Unsigned16,
    /// 8-bit unsigned integer (`u8`)
    Unsigned8,
    /// 8-bit signed integer (`s8`)
    Signed8,
    /// 12 reserved bytes that are never decoded (`hzn`)
    Opaque12,
}

impl FieldType {
    /// Every type, in the order the decoded frame's maps are rendered.
    pub const ALL: [FieldType; 7] = [
        FieldType::Signed32,
        FieldType::Unsigned32,
        FieldType::Float32,
        FieldType::Unsigned16,
        FieldType::Unsigned8,
        FieldType::Signed8,
        FieldType::Opaque12,
    ];

    /// Returns the size in bytes this type occupies in a datagram.
    pub const fn width(&self) -> usize {
        match self {
            FieldType::Signed32 | FieldType::Unsigned32 | FieldType::Float32 => 4,
            FieldType::Unsigned16 => 2,
            FieldType::Unsigned8 | FieldType::Signed8 => 1,
            FieldType::Opaque12 => 12,
        }
    }

    /// The token used for this type in packet format files.
    pub const fn token(&self) -> &'static str {
        match self {
            FieldType::Signed32 => "s32",
            FieldType::Unsigned32 => "u32",
            FieldType::Float32 => "f32",
            FieldType::Unsigned16 => "u16",
            FieldType::Unsigned8 => "u8",
            FieldType::Signed8 => "s8",
            FieldType::Opaque12 => "hzn",
        }
    }

    /// Reserved regions consume bytes but produce no value.
    pub const fn is_opaque(&self) -> bool {
        matches!(self, FieldType::Opaque12)
    }
}

impl FromStr for FieldType {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        FieldType::ALL.into_iter().find(|ty| ty.token() == token).ok_or(())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Runtime value of a single decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Signed32(i32),
    Unsigned32(u32),
    Float32(f32),
    Unsigned16(u16),
    Unsigned8(u8),
    Signed8(i8),
}

impl Value {
    /// The field type this value was decoded from.
    pub const fn field_type(&self) -> FieldType {
        match self {
            Value::Signed32(_) => FieldType::Signed32,
            Value::Unsigned32(_) => FieldType::Unsigned32,
            Value::Float32(_) => FieldType::Float32,
            Value::Unsigned16(_) => FieldType::Unsigned16,
            Value::Unsigned8(_) => FieldType::Unsigned8,
            Value::Signed8(_) => FieldType::Signed8,
        }
    }

    /// Little-endian wire encoding of this value.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Value::Signed32(v) => v.to_le_bytes().to_vec(),
            Value::Unsigned32(v) => v.to_le_bytes().to_vec(),
            Value::Float32(v) => v.to_le_bytes().to_vec(),
            Value::Unsigned16(v) => v.to_le_bytes().to_vec(),
            Value::Unsigned8(v) => vec![*v],
            Value::Signed8(v) => v.to_le_bytes().to_vec(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Signed32(v) => write!(f, "{}", v),
            Value::Unsigned32(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Unsigned16(v) => write!(f, "{}", v),
            Value::Unsigned8(v) => write!(f, "{}", v),
            Value::Signed8(v) => write!(f, "{}", v),
        }
    }
}
