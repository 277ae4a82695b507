//! Append-only CSV log.
//!
//! The header row lists every schema field name in declaration order,
//! reserved regions included. Each data row has one cell per field; reserved
//! regions get an empty cell so columns always line up with the header.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::sinks::FrameSink;
use crate::{DecodedFrame, PacketSchema, Result, TelemetryError};

/// Writes one row per published frame.
pub struct CsvLogger {
    path: PathBuf,
    file: File,
    rows: u64,
}

impl CsvLogger {
    /// Truncate `path`, write the header, and reopen it for appending.
    pub fn create<P: AsRef<Path>>(path: P, schema: &PacketSchema) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let io_error = |err| TelemetryError::file_error(path.clone(), err);

        std::fs::write(&path, format!("{}\n", header(schema))).map_err(io_error)?;
        let file = OpenOptions::new().append(true).open(&path).map_err(io_error)?;

        Ok(Self { path, file, rows: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written since creation.
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

/// Comma-joined field names.
pub fn header(schema: &PacketSchema) -> String {
    schema.field_names().collect::<Vec<_>>().join(",")
}

/// Comma-joined values in schema order.
pub fn row(schema: &PacketSchema, frame: &DecodedFrame) -> String {
    schema
        .fields
        .iter()
        .map(|field| frame.value_of(field).map(|value| value.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

impl FrameSink for CsvLogger {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn publish(&mut self, schema: &PacketSchema, frame: &DecodedFrame) -> Result<()> {
        let line = format!("{}\n", row(schema, frame));
        self.file
            .write_all(line.as_bytes())
            .map_err(|err| TelemetryError::file_error(self.path.clone(), err))?;
        self.rows += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;
    use crate::schema::{PacketFormat, parse_schema};
    use crate::test_utils::{PacketBuilder, motorsport_driving_packet};
    use crate::Value;

    #[test]
    fn header_and_rows_include_reserved_columns() {
        let schema = parse_schema("u8 Gear\nhzn Reserved\nf32 Power\ns8 Steer\n", None).unwrap();
        let packet = PacketBuilder::new(&schema)
            .set("Gear", Value::Unsigned8(3))
            .set("Power", Value::Float32(200.0))
            .set("Steer", Value::Signed8(-5))
            .build();
        let frame = decode(&schema, &packet).unwrap();

        assert_eq!(header(&schema), "Gear,Reserved,Power,Steer");
        assert_eq!(row(&schema, &frame), "3,,200,-5");
    }

    #[test]
    fn logger_appends_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.csv");
        let schema = PacketFormat::Horizon.schema().unwrap();
        let frame = decode(&schema, &motorsport_driving_packet(&schema)).unwrap();

        let mut logger = CsvLogger::create(&path, &schema).unwrap();
        logger.publish(&schema, &frame).unwrap();
        logger.publish(&schema, &frame).unwrap();
        assert_eq!(logger.rows(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);

        let header_cells = lines[0].split(',').count();
        assert_eq!(header_cells, schema.field_count());
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), header_cells);
        }
        assert!(lines[1].contains(",6400,"));
    }

    #[test]
    fn create_truncates_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.csv");
        std::fs::write(&path, "stale\nrows\n").unwrap();

        let schema = parse_schema("u8 Gear\n", None).unwrap();
        CsvLogger::create(&path, &schema).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Gear\n");
    }

    #[test]
    fn create_fails_for_missing_directory() {
        let schema = parse_schema("u8 Gear\n", None).unwrap();
        let err = CsvLogger::create("no/such/dir/session.csv", &schema).err().unwrap();
        assert!(matches!(err, TelemetryError::File { .. }));
    }
}
