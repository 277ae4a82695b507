//! Provider trait for datagram sources

use super::types::FramePacket;
use crate::Result;

/// Trait for telemetry datagram sources
///
/// Providers abstract over where datagrams come from (a UDP socket in
/// production, scripted sequences in tests) and handle their own waiting.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next datagram
    ///
    /// Returns:
    /// - `Ok(Some(packet))` - Datagram received
    /// - `Ok(None)` - Source ended (normal termination)
    /// - `Err(e)` - Receive failed; the decode loop treats this as fatal
    async fn next_packet(&mut self) -> Result<Option<FramePacket>>;
}
