//! Packet format file parsing
//!
//! A packet format file declares one field per line:
//!
//! ```text
//! s32 IsRaceOn ; 1 when in a race, 0 in menus or paused
//! u32 TimestampMS
//! f32 CurrentEngineRpm
//! hzn HorizonReserved
//! ```
//!
//! Everything after `;` is a comment. The first token is the type, the rest of
//! the line is the field name. Byte ranges are assigned by walking the fields
//! in order with a running cursor, so every field starts where the previous
//! one ended and the last field's end is the datagram size.
//!
//! Any unrecognised type token or missing name rejects the whole file.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::{FieldDescriptor, FieldType, PacketSchema, Result, TelemetryError};

/// Load and parse a packet format file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PacketSchema> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading packet format");

    let text = std::fs::read_to_string(path)
        .map_err(|err| TelemetryError::file_error(path.to_path_buf(), err))?;

    parse_schema(&text, Some(path.to_path_buf()))
}

/// Parse packet format text. `source` is only used for diagnostics.
pub fn parse_schema(text: &str, source: Option<PathBuf>) -> Result<PacketSchema> {
    let mut fields = Vec::new();
    let mut cursor = 0usize;

    for (index, line) in text.lines().enumerate() {
        let Some((token, name)) = split_line(line) else {
            continue;
        };

        let field_type: FieldType = token
            .parse()
            .map_err(|_| TelemetryError::unknown_type(source.clone(), index, token))?;

        let name = name.ok_or_else(|| TelemetryError::missing_name(source.clone(), index, token))?;

        let start = cursor;
        let end = start + field_type.width();
        cursor = end;

        trace!(index, name, %field_type, start, end, "Processed format line");

        fields.push(FieldDescriptor { index, name: name.to_string(), field_type, start, end });
    }

    let schema = PacketSchema::new(fields, source)?;

    debug!(
        fields = schema.field_count(),
        packet_size = schema.packet_size,
        "Packet format processed"
    );

    Ok(schema)
}

/// Split a line into its type token and optional name, ignoring comments.
///
/// Returns `None` for lines with nothing but whitespace or a comment.
fn split_line(line: &str) -> Option<(&str, Option<&str>)> {
    let content = match line.split_once(';') {
        Some((content, _comment)) => content,
        None => line,
    };

    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    match content.split_once(char::is_whitespace) {
        Some((token, rest)) => {
            let name = rest.trim();
            Some((token, (!name.is_empty()).then_some(name)))
        }
        None => Some((content, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    fn arb_field_type() -> impl Strategy<Value = FieldType> {
        prop::sample::select(FieldType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_byte_ranges_tile_the_packet(
            types in prop::collection::vec(arb_field_type(), 1..64)
        ) {
            let text: String = types
                .iter()
                .enumerate()
                .map(|(i, ty)| format!("{} Field{} ; generated\n", ty.token(), i))
                .collect();

            let schema = parse_schema(&text, None).unwrap();

            prop_assert_eq!(schema.field_count(), types.len());
            let mut cursor = 0;
            for (field, ty) in schema.fields.iter().zip(&types) {
                prop_assert_eq!(field.start, cursor);
                prop_assert_eq!(field.end - field.start, ty.width());
                prop_assert!(field.end > field.start);
                cursor = field.end;
            }
            let total: usize = types.iter().map(FieldType::width).sum();
            prop_assert_eq!(schema.packet_size, total);
        }
    }

    #[test]
    fn two_field_scenario_offsets() {
        let schema = parse_schema("u8 Gear\nf32 Power\n", None).unwrap();

        let ranges: Vec<_> = schema.fields.iter().map(FieldDescriptor::byte_range).collect();
        assert_eq!(ranges, vec![0..1, 1..5]);
        assert_eq!(schema.packet_size, 5);
        assert_eq!(schema.fields[0].index, 0);
        assert_eq!(schema.fields[1].index, 1);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let text = "; header comment\n\ns32 IsRaceOn ; race flag\n   \nhzn Reserved;no space\r\nu16 LapNumber\n";
        let schema = parse_schema(text, None).unwrap();

        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["IsRaceOn", "Reserved", "LapNumber"]);
        assert_eq!(schema.fields[0].index, 2);
        assert_eq!(schema.fields[1].byte_range(), 4..16);
        assert_eq!(schema.packet_size, 18);
    }

    #[test]
    fn whitespace_runs_separate_type_and_name() {
        let schema = parse_schema("f32 \t  Speed   \n", None).unwrap();
        assert_eq!(schema.fields[0].name, "Speed");
    }

    #[test]
    fn unknown_type_rejects_whole_schema() {
        let err = parse_schema("u8 Gear\nu64 Foo\nf32 Power\n", None).unwrap_err();
        match err {
            TelemetryError::Schema { line, details, .. } => {
                assert_eq!(line, 1);
                assert!(details.contains("u64"));
            }
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = parse_schema("u8 Gear\nf32\n", None).unwrap_err();
        assert!(matches!(err, TelemetryError::Schema { line: 1, .. }));

        let err = parse_schema("f32   ; only a comment follows\n", None).unwrap_err();
        assert!(matches!(err, TelemetryError::Schema { line: 0, .. }));
    }

    #[test]
    fn empty_schema_has_zero_size() {
        let schema = parse_schema("\n; nothing here\n", None).unwrap();
        assert_eq!(schema.field_count(), 0);
        assert_eq!(schema.packet_size, 0);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "u8 Gear").unwrap();
        writeln!(file, "f32 Power ; watts").unwrap();

        let schema = load(file.path()).unwrap();
        assert_eq!(schema.packet_size, 5);
        assert_eq!(schema.source(), Some(file.path()));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load("definitely/not/here.dat").unwrap_err();
        match err {
            TelemetryError::File { path, .. } => {
                assert_eq!(path, PathBuf::from("definitely/not/here.dat"));
            }
            other => panic!("Expected file error, got {other:?}"),
        }
    }
}
