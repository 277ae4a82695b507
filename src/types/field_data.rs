//! Field data parsing trait and implementations

use super::{FieldDescriptor, FieldType};

/// Trait for types that can be parsed from a field's bytes in a datagram.
pub trait FieldData: Sized {
    /// Parse this type from the descriptor's byte range within `data`.
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self>;
}

fn field_bytes<'a, const N: usize>(
    data: &'a [u8],
    field: &FieldDescriptor,
    expected: FieldType,
) -> crate::Result<&'a [u8; N]> {
    if field.field_type != expected {
        return Err(crate::TelemetryError::Schema {
            path: None,
            line: field.index,
            details: format!(
                "field '{}' is {:?}, read as {:?}",
                field.name, field.field_type, expected
            ),
        });
    }

    data.get(field.start..field.start + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(crate::TelemetryError::ShortPacket { expected: field.end, actual: data.len() })
}

impl FieldData for i32 {
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self> {
        Ok(i32::from_le_bytes(*field_bytes::<4>(data, field, FieldType::Signed32)?))
    }
}

impl FieldData for u32 {
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self> {
        Ok(u32::from_le_bytes(*field_bytes::<4>(data, field, FieldType::Unsigned32)?))
    }
}

impl FieldData for f32 {
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self> {
        // Reinterpret the little-endian bit pattern, not a numeric cast.
        let bits = u32::from_le_bytes(*field_bytes::<4>(data, field, FieldType::Float32)?);
        Ok(f32::from_bits(bits))
    }
}

impl FieldData for u16 {
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self> {
        Ok(u16::from_le_bytes(*field_bytes::<2>(data, field, FieldType::Unsigned16)?))
    }
}

impl FieldData for u8 {
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self> {
        let [byte] = *field_bytes::<1>(data, field, FieldType::Unsigned8)?;
        Ok(byte)
    }
}

impl FieldData for i8 {
    fn from_bytes(data: &[u8], field: &FieldDescriptor) -> crate::Result<Self> {
        Ok(i8::from_le_bytes(*field_bytes::<1>(data, field, FieldType::Signed8)?))
    }
}
