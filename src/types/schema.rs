//! Packet schema types

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::FieldType;

/// Ordered field layout of one datagram, as loaded from a packet format file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketSchema {
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Total number of bytes a datagram must carry
    pub packet_size: usize,
    /// File the schema was loaded from, when there was one
    pub source: Option<PathBuf>,
}

impl PacketSchema {
    /// Create a new PacketSchema with validation.
    pub fn new(fields: Vec<FieldDescriptor>, source: Option<PathBuf>) -> crate::Result<Self> {
        let packet_size = fields.last().map_or(0, |field| field.end);
        let schema = Self { fields, packet_size, source };
        schema.validate()?;
        Ok(schema)
    }

    /// Validate that byte ranges tile the packet without gaps or overlap.
    pub fn validate(&self) -> crate::Result<()> {
        let mut cursor = 0;
        for field in &self.fields {
            if field.start != cursor || field.end != field.start + field.field_type.width() {
                return Err(crate::TelemetryError::Schema {
                    path: self.source.clone(),
                    line: field.index,
                    details: format!(
                        "field '{}' occupies {}..{}, expected {}..{}",
                        field.name,
                        field.start,
                        field.end,
                        cursor,
                        cursor + field.field_type.width()
                    ),
                });
            }
            cursor = field.end;
        }

        if cursor != self.packet_size {
            return Err(crate::TelemetryError::Schema {
                path: self.source.clone(),
                line: self.fields.last().map_or(0, |field| field.index),
                details: format!(
                    "fields end at byte {} but packet size is {}",
                    cursor, self.packet_size
                ),
            });
        }

        Ok(())
    }

    /// Get the first field with the given name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Get the number of fields, reserved regions included.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Path the schema was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// One field of the packet layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Zero-based line of the format file that declared the field
    pub index: usize,
    /// Field name as written in the format file
    pub name: String,
    /// Declared primitive type
    pub field_type: FieldType,
    /// First byte of the field within the datagram
    pub start: usize,
    /// One past the last byte of the field
    pub end: usize,
}

impl FieldDescriptor {
    /// Half-open byte range of the field.
    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }
}
