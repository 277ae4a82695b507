//! Offset-driven datagram decoding.
//!
//! [`decode`] walks the schema in declaration order, slices each field's byte
//! range out of the datagram and stores the little-endian value in the
//! [`DecodedFrame`] map for its type. Reserved (`hzn`) regions are skipped.
//!
//! A datagram shorter than the schema is rejected up front with
//! [`TelemetryError::ShortPacket`], so no partial frame is ever produced.
//! Longer datagrams are accepted and the trailing bytes ignored.

use tracing::trace;

use crate::types::{DecodedFrame, FieldData, FieldDescriptor, FieldType, PacketSchema, Value};
use crate::{Result, TelemetryError};

/// Decode one datagram against a loaded schema.
pub fn decode(schema: &PacketSchema, data: &[u8]) -> Result<DecodedFrame> {
    decode_fields(&schema.fields, data)
}

/// Decode one datagram against a bare descriptor list.
pub fn decode_fields(fields: &[FieldDescriptor], data: &[u8]) -> Result<DecodedFrame> {
    let required = fields.iter().map(|field| field.end).max().unwrap_or(0);
    if data.len() < required {
        return Err(TelemetryError::short_packet(required, data.len()));
    }

    let mut frame = DecodedFrame::default();
    for field in fields {
        let Some(value) = read_value(data, field)? else {
            continue;
        };

        trace!(
            index = field.index,
            name = %field.name,
            start = field.start,
            end = field.end,
            ?value,
            "Decoded field"
        );

        frame.insert(&field.name, value);
    }

    Ok(frame)
}

/// Read a single field. Reserved regions yield `None`.
pub fn read_value(data: &[u8], field: &FieldDescriptor) -> Result<Option<Value>> {
    let value = match field.field_type {
        FieldType::Signed32 => Value::Signed32(i32::from_bytes(data, field)?),
        FieldType::Unsigned32 => Value::Unsigned32(u32::from_bytes(data, field)?),
        FieldType::Float32 => Value::Float32(f32::from_bytes(data, field)?),
        FieldType::Unsigned16 => Value::Unsigned16(u16::from_bytes(data, field)?),
        FieldType::Unsigned8 => Value::Unsigned8(u8::from_bytes(data, field)?),
        FieldType::Signed8 => Value::Signed8(i8::from_bytes(data, field)?),
        FieldType::Opaque12 => return Ok(None),
    };
    Ok(Some(value))
}
