//! Test utilities for building datagrams and locating bundled format files
//!
//! This module provides helpers shared by unit tests, integration tests and
//! benchmarks. It is only compiled for tests or with the `benchmark` feature.

#![cfg(any(test, feature = "benchmark"))]

use std::path::PathBuf;

use crate::schema::PacketFormat;
use crate::types::{PacketSchema, Value};

/// Builds a datagram for a schema from named values.
///
/// Every field starts zeroed; [`PacketBuilder::set`] writes the little-endian
/// encoding of a value into each field with a matching name and type.
/// Reserved regions are filled with `0xAA` so tests notice if they leak.
#[derive(Debug, Clone)]
pub struct PacketBuilder<'a> {
    schema: &'a PacketSchema,
    data: Vec<u8>,
}

impl<'a> PacketBuilder<'a> {
    /// Start a zeroed datagram sized for `schema`.
    pub fn new(schema: &'a PacketSchema) -> Self {
        let mut data = vec![0u8; schema.packet_size];
        for field in schema.fields.iter().filter(|f| f.field_type.is_opaque()) {
            data[field.byte_range()].fill(0xAA);
        }
        Self { schema, data }
    }

    /// Write `value` into every field called `name` of the value's type.
    ///
    /// # Panics
    ///
    /// Panics if no such field exists, so typos fail the test that made them.
    pub fn set(mut self, name: &str, value: Value) -> Self {
        let mut written = false;
        for field in &self.schema.fields {
            if field.name == name && field.field_type == value.field_type() {
                self.data[field.byte_range()].copy_from_slice(&value.to_le_bytes());
                written = true;
            }
        }
        assert!(written, "no {:?} field named '{}' in schema", value.field_type(), name);
        self
    }

    /// Finish the datagram.
    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// A Motorsport datagram with plausible on-track values.
pub fn motorsport_driving_packet(schema: &PacketSchema) -> Vec<u8> {
    PacketBuilder::new(schema)
        .set("IsRaceOn", Value::Signed32(1))
        .set("TimestampMS", Value::Unsigned32(1_000_000))
        .set("EngineMaxRpm", Value::Float32(8500.0))
        .set("CurrentEngineRpm", Value::Float32(6400.0))
        .set("Speed", Value::Float32(44.7))
        .set("Power", Value::Float32(223_700.0))
        .set("Torque", Value::Float32(410.0))
        .set("TireCombinedSlipRearLeft", Value::Float32(1.2))
        .set("TireCombinedSlipRearRight", Value::Float32(1.4))
        .set("TireCombinedSlipFrontLeft", Value::Float32(0.3))
        .set("TireCombinedSlipFrontRight", Value::Float32(0.2))
        .set("LapNumber", Value::Unsigned16(3))
        .set("Gear", Value::Unsigned8(4))
        .set("Steer", Value::Signed8(-20))
        .build()
}

/// Directory holding the bundled packet format files.
pub fn formats_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("formats")
}

/// Path of a bundled packet format file on disk.
pub fn format_file(format: PacketFormat) -> PathBuf {
    formats_dir().join(format.file_name())
}
