//! Driver runs the decode loop
//!
//! One datagram at a time: receive, decode, apply the idle-frame rule, then
//! hand the frame to every sink before receiving the next one. There is no
//! buffering between stages, so a slow sink slows the loop down.

use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::provider::Provider;
use crate::decoder::decode;
use crate::sinks::Sinks;
use crate::{PacketSchema, Result, TelemetryError};

/// Counters collected over one run of the decode loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    /// Datagrams received
    pub received: u64,
    /// Frames handed to the sinks
    pub published: u64,
    /// Frames dropped because the engine RPM was zero
    pub idle: u64,
    /// Datagrams dropped because they were shorter than the schema
    pub malformed: u64,
}

/// Decode loop over a provider
pub struct Driver {
    schema: Arc<PacketSchema>,
    sinks: Sinks,
    stats: DriverStats,
}

impl Driver {
    pub fn new(schema: Arc<PacketSchema>, sinks: Sinks) -> Self {
        Self { schema, sinks, stats: DriverStats::default() }
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Run until the provider ends, the token is cancelled, or a fatal error occurs.
    ///
    /// Short datagrams are logged and skipped. Receive and sink errors end the
    /// loop and are returned to the caller.
    pub async fn run<P>(&mut self, mut provider: P, cancel: CancellationToken) -> Result<DriverStats>
    where
        P: Provider,
    {
        info!(
            fields = self.schema.field_count(),
            packet_size = self.schema.packet_size,
            sinks = ?self.sinks.names(),
            "Decode loop started"
        );

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Decode loop cancelled");
                    break;
                }
                result = provider.next_packet() => result,
            };

            let packet = match result {
                Ok(Some(packet)) => packet,
                Ok(None) => {
                    info!("Provider ended after {} datagrams", self.stats.received);
                    break;
                }
                Err(e) => {
                    error!("Failed to receive datagram: {}", e);
                    return Err(e);
                }
            };

            self.stats.received += 1;

            let frame = match decode(&self.schema, &packet.data) {
                Ok(frame) => frame,
                Err(e @ TelemetryError::ShortPacket { .. }) => {
                    self.stats.malformed += 1;
                    warn!(sequence = packet.sequence, source = ?packet.source, "Skipping datagram: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if frame.is_idle() {
                self.stats.idle += 1;
                trace!(sequence = packet.sequence, "Engine RPM is zero, skipping frame");
                continue;
            }

            if let Err(e) = self.sinks.publish(&self.schema, &frame) {
                error!("Sink failed: {}", e);
                return Err(e);
            }
            self.stats.published += 1;
        }

        debug!(stats = ?self.stats, "Decode loop ended");
        Ok(self.stats)
    }
}
