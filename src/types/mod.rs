//! Core types for telemetry data representation.
//!
//! This module provides the foundational data structures for Forza "Data Out"
//! telemetry: the packet layout loaded from a format file, raw datagrams, and
//! the typed frame a datagram decodes into.
//!
//! ## Architecture
//!
//! - [`FieldType`] is the closed set of primitive types a format file may declare
//! - [`FieldDescriptor`] places one named field at a byte range within a datagram
//! - [`PacketSchema`] is the ordered, contiguous list of descriptors
//! - [`FramePacket`] carries one received datagram with zero-copy data
//! - [`DecodedFrame`] holds the decoded values, one map per numeric type
//! - [`FieldData`] provides type-checked, bounds-checked field reads
//!
//! ## Usage Example
//!
//! ```rust
//! use forza_telemetry::types::{FieldData, FieldDescriptor, FieldType};
//!
//! let rpm = FieldDescriptor {
//!     index: 0,
//!     name: "CurrentEngineRpm".to_string(),
//!     field_type: FieldType::Float32,
//!     start: 0,
//!     end: 4,
//! };
//!
//! let data = 4500.0f32.to_le_bytes();
//! let value = f32::from_bytes(&data, &rpm).unwrap();
//! assert_eq!(value, 4500.0);
//! ```

mod field_data;
mod field_type;
mod frame;
mod schema;

// Re-export all public types
pub use field_data::FieldData;
pub use field_type::{FieldType, Value};
pub use frame::{DecodedFrame, ENGINE_RPM_FIELD, FramePacket};
pub use schema::{FieldDescriptor, PacketSchema};
