//! Single-slot holder for the latest snapshot string.
//!
//! The decode loop owns the [`SnapshotPublisher`] and replaces the slot on
//! every published frame; the HTTP server holds [`SnapshotReader`]s and reads
//! whatever was published last. Built on a `tokio::sync::watch` channel, so a
//! reader never blocks the writer and only the newest value is retained.

use std::sync::Arc;
use tokio::sync::watch;

use crate::sinks::FrameSink;
use crate::{DecodedFrame, PacketSchema, Result};

/// Create a connected publisher/reader pair holding an empty snapshot.
pub fn snapshot_slot() -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Arc::<str>::from(""));
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

/// Writing half of the snapshot slot.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<str>>,
}

impl SnapshotPublisher {
    /// Replace the current snapshot. Succeeds even with no readers left.
    pub fn replace(&self, snapshot: String) {
        self.tx.send_replace(snapshot.into());
    }

    /// Another reader attached to the same slot.
    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader { rx: self.tx.subscribe() }
    }
}

impl FrameSink for SnapshotPublisher {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn publish(&mut self, _schema: &PacketSchema, frame: &DecodedFrame) -> Result<()> {
        self.replace(frame.to_snapshot()?);
        Ok(())
    }
}

/// Reading half of the snapshot slot.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<str>>,
}

impl SnapshotReader {
    /// The most recently published snapshot; empty before the first frame.
    pub fn current(&self) -> Arc<str> {
        Arc::clone(&self.rx.borrow())
    }

    /// Wait until a snapshot newer than the last one seen is published.
    ///
    /// Returns `false` once the publisher has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn readers_see_latest_snapshot() {
        let (mut publisher, reader) = snapshot_slot();
        let second_reader = publisher.subscribe();
        assert_eq!(&*reader.current(), "");

        let schema = crate::schema::parse_schema("f32 Speed\n", None).unwrap();
        for speed in [10.0f32, 20.5] {
            let mut frame = DecodedFrame::default();
            frame.insert("Speed", Value::Float32(speed));
            publisher.publish(&schema, &frame).unwrap();
        }

        assert_eq!(&*reader.current(), r#"{}, {}, {"Speed":20.5}, {}, {}, {}"#);
        assert_eq!(reader.current(), second_reader.current());
    }

    #[tokio::test]
    async fn changed_wakes_on_publish_and_ends_on_drop() {
        let (publisher, mut reader) = snapshot_slot();

        publisher.replace("first".to_string());
        assert!(reader.changed().await);
        assert_eq!(&*reader.current(), "first");

        drop(publisher);
        assert!(!reader.changed().await);
    }
}
