//! Output sinks for decoded frames.
//!
//! Every enabled sink receives each non-idle frame synchronously, in the
//! order the sinks were added, before the next datagram is read.
//!
//! - [`ConsoleSink`] prints a one-line dashboard per frame
//! - [`CsvLogger`] appends one row per frame to a CSV file
//! - [`JsonLogger`] appends one snapshot string per frame to a file
//! - [`SnapshotPublisher`] replaces the snapshot served over HTTP

mod console;
pub mod csv;
mod json_log;
mod snapshot;

pub use console::ConsoleSink;
pub use csv::CsvLogger;
pub use json_log::JsonLogger;
pub use snapshot::{SnapshotPublisher, SnapshotReader, snapshot_slot};

use tracing::{debug, info};

use crate::config::Config;
use crate::{DecodedFrame, PacketSchema, Result};

/// Consumer of decoded frames.
pub trait FrameSink: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Handle one decoded frame. Errors are fatal to the decode loop.
    fn publish(&mut self, schema: &PacketSchema, frame: &DecodedFrame) -> Result<()>;
}

/// Ordered set of enabled sinks.
#[derive(Default)]
pub struct Sinks {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl Sinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sinks a configuration enables.
    ///
    /// File sinks create (truncate) their files here, so I/O problems surface
    /// before any datagram is read. The snapshot publisher is only added when
    /// one is supplied.
    pub fn from_config(
        config: &Config,
        schema: &PacketSchema,
        snapshot: Option<SnapshotPublisher>,
    ) -> Result<Self> {
        let mut sinks = Sinks::new();

        if config.console {
            sinks.push(ConsoleSink::stdout());
        } else {
            info!("Realtime terminal output disabled");
        }

        match &config.csv_path {
            Some(path) => {
                info!(path = %path.display(), "Logging data to CSV");
                sinks.push(CsvLogger::create(path, schema)?);
            }
            None => info!("CSV logging disabled"),
        }

        match &config.json_log_path {
            Some(path) => {
                info!(path = %path.display(), "Logging snapshots to JSON file");
                sinks.push(JsonLogger::create(path)?);
            }
            None => info!("JSON logging disabled"),
        }

        if let Some(publisher) = snapshot {
            sinks.push(publisher);
        }

        Ok(sinks)
    }

    pub fn push<S: FrameSink + 'static>(&mut self, sink: S) {
        debug!(sink = sink.name(), "Sink enabled");
        self.sinks.push(Box::new(sink));
    }

    /// Hand a frame to every sink, stopping at the first failure.
    pub fn publish(&mut self, schema: &PacketSchema, frame: &DecodedFrame) -> Result<()> {
        for sink in &mut self.sinks {
            sink.publish(schema, frame)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Names of the enabled sinks, in publish order.
    pub fn names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema;
    use crate::Value;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FrameSink for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn publish(&mut self, _schema: &PacketSchema, _frame: &DecodedFrame) -> Result<()> {
            self.log.lock().unwrap().push(self.label);
            Ok(())
        }
    }

    #[test]
    fn sinks_run_in_insertion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sinks = Sinks::new();
        sinks.push(Recorder { label: "first", log: Arc::clone(&log) });
        sinks.push(Recorder { label: "second", log: Arc::clone(&log) });

        let schema = parse_schema("u8 Gear\n", None).unwrap();
        let mut frame = DecodedFrame::default();
        frame.insert("Gear", Value::Unsigned8(2));

        sinks.publish(&schema, &frame).unwrap();
        sinks.publish(&schema, &frame).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "first", "second"]);
        assert_eq!(sinks.names(), vec!["first", "second"]);
    }

    #[test]
    fn from_config_enables_requested_file_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            console: false,
            csv_path: Some(dir.path().join("laps.csv")),
            json_log_path: Some(dir.path().join("laps.json")),
            ..Config::default()
        };
        let schema = parse_schema("u8 Gear\nf32 Power\n", None).unwrap();
        let (publisher, _reader) = snapshot_slot();

        let sinks = Sinks::from_config(&config, &schema, Some(publisher)).unwrap();

        assert_eq!(sinks.names(), vec!["csv", "json-log", "snapshot"]);
        assert!(dir.path().join("laps.csv").exists());
        assert!(dir.path().join("laps.json").exists());
    }
}
