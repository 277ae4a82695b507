//! Datagram and decoded frame types

use serde::Serialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use super::{FieldDescriptor, FieldType, Value};

/// Name of the float field that is zero while the game is paused or in menus.
pub const ENGINE_RPM_FIELD: &str = "CurrentEngineRpm";

/// Raw telemetry datagram as received from the game.
#[derive(Debug, Clone)]
pub struct FramePacket {
    /// Datagram payload (zero-copy via Arc)
    pub data: Arc<[u8]>,

    /// Monotonic datagram counter
    pub sequence: u64,

    /// Sender address, when known
    pub source: Option<SocketAddr>,
}

impl FramePacket {
    /// Create a new frame packet
    pub fn new(data: Vec<u8>, sequence: u64, source: Option<SocketAddr>) -> Self {
        Self { data: data.into(), sequence, source }
    }
}

/// Typed values of one datagram, one map per numeric field type.
///
/// Maps are keyed by field name and ordered by key, so the JSON rendering is
/// stable. A name declared twice with the same type keeps the later value; the
/// same name under two different types lives in two maps independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedFrame {
    pub s32: BTreeMap<String, i32>,
    pub u32: BTreeMap<String, u32>,
    pub f32: BTreeMap<String, f32>,
    pub u16: BTreeMap<String, u16>,
    pub u8: BTreeMap<String, u8>,
    pub s8: BTreeMap<String, i8>,
}

impl DecodedFrame {
    /// Store a value under `name` in the map for its type.
    pub fn insert(&mut self, name: &str, value: Value) {
        let name = name.to_string();
        match value {
            Value::Signed32(v) => {
                self.s32.insert(name, v);
            }
            Value::Unsigned32(v) => {
                self.u32.insert(name, v);
            }
            Value::Float32(v) => {
                self.f32.insert(name, v);
            }
            Value::Unsigned16(v) => {
                self.u16.insert(name, v);
            }
            Value::Unsigned8(v) => {
                self.u8.insert(name, v);
            }
            Value::Signed8(v) => {
                self.s8.insert(name, v);
            }
        }
    }

    /// Look up a value by type and name.
    pub fn get(&self, field_type: FieldType, name: &str) -> Option<Value> {
        match field_type {
            FieldType::Signed32 => self.s32.get(name).copied().map(Value::Signed32),
            FieldType::Unsigned32 => self.u32.get(name).copied().map(Value::Unsigned32),
            FieldType::Float32 => self.f32.get(name).copied().map(Value::Float32),
            FieldType::Unsigned16 => self.u16.get(name).copied().map(Value::Unsigned16),
            FieldType::Unsigned8 => self.u8.get(name).copied().map(Value::Unsigned8),
            FieldType::Signed8 => self.s8.get(name).copied().map(Value::Signed8),
            FieldType::Opaque12 => None,
        }
    }

    /// Value currently held for a schema field. Reserved fields have none.
    pub fn value_of(&self, field: &FieldDescriptor) -> Option<Value> {
        self.get(field.field_type, &field.name)
    }

    /// Convenience float lookup, defaulting missing fields to zero.
    pub fn f32_or_zero(&self, name: &str) -> f32 {
        self.f32.get(name).copied().unwrap_or_default()
    }

    /// Convenience u8 lookup, defaulting missing fields to zero.
    pub fn u8_or_zero(&self, name: &str) -> u8 {
        self.u8.get(name).copied().unwrap_or_default()
    }

    /// Whether the game sent a zeroed frame (paused, rewinding or in menus).
    ///
    /// Only an engine RPM of exactly zero counts. A schema without the field
    /// never produces an idle frame, so custom layouts lacking
    /// `CurrentEngineRpm` publish every datagram. Keep it that way: treating
    /// a missing field as zero would silently drop all of their frames.
    pub fn is_idle(&self) -> bool {
        self.f32.get(ENGINE_RPM_FIELD).is_some_and(|rpm| *rpm == 0.0)
    }

    /// Total number of decoded values across all maps.
    pub fn len(&self) -> usize {
        self.s32.len() + self.u32.len() + self.f32.len() + self.u16.len() + self.u8.len() + self.s8.len()
    }

    /// Whether no values were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the snapshot string: the six maps as JSON objects joined by `", "`.
    ///
    /// This is a display-oriented concatenation, not one JSON document.
    pub fn to_snapshot(&self) -> crate::Result<String> {
        let parts = [
            serde_json::to_string(&self.s32)?,
            serde_json::to_string(&self.u32)?,
            serde_json::to_string(&self.f32)?,
            serde_json::to_string(&self.u16)?,
            serde_json::to_string(&self.u8)?,
            serde_json::to_string(&self.s8)?,
        ];
        Ok(parts.join(", "))
    }
}
