//! Append-only log of snapshot strings, one per line.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::sinks::FrameSink;
use crate::{DecodedFrame, PacketSchema, Result, TelemetryError};

pub struct JsonLogger {
    path: PathBuf,
    file: File,
}

impl JsonLogger {
    /// Create (or truncate) the log file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|err| TelemetryError::file_error(path.clone(), err))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSink for JsonLogger {
    fn name(&self) -> &'static str {
        "json-log"
    }

    fn publish(&mut self, _schema: &PacketSchema, frame: &DecodedFrame) -> Result<()> {
        let line = format!("{}\n", frame.to_snapshot()?);
        self.file
            .write_all(line.as_bytes())
            .map_err(|err| TelemetryError::file_error(self.path.clone(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn one_snapshot_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.log");
        let schema = crate::schema::parse_schema("u8 Gear\n", None).unwrap();

        let mut logger = JsonLogger::create(&path).unwrap();
        for gear in [1u8, 2] {
            let mut frame = DecodedFrame::default();
            frame.insert("Gear", Value::Unsigned8(gear));
            logger.publish(&schema, &frame).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "{}, {}, {}, {}, {\"Gear\":1}, {}\n{}, {}, {}, {}, {\"Gear\":2}, {}\n"
        );
    }
}
