//! UDP provider for the game's "Data Out" stream

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::provider::Provider;
use crate::types::FramePacket;
use crate::{Result, TelemetryError};

/// Receive buffer size; larger than any known Data Out datagram.
pub const MAX_DATAGRAM_SIZE: usize = 1500;

/// Provider that receives one telemetry record per UDP datagram
pub struct UdpProvider {
    /// Bound socket
    socket: UdpSocket,

    /// Receive buffer, reused for every datagram
    buffer: Vec<u8>,

    /// Datagrams received so far
    sequence: u64,

    /// Senders already announced in the log
    peers: HashSet<SocketAddr>,
}

impl UdpProvider {
    /// Bind a UDP socket on `addr`.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|err| TelemetryError::socket_error("bind", Some(addr), err))?;

        let local = socket.local_addr().ok();
        info!(addr = ?local, "UDP listener bound");

        Ok(Self {
            socket,
            buffer: vec![0u8; MAX_DATAGRAM_SIZE],
            sequence: 0,
            peers: HashSet::new(),
        })
    }

    /// Address the socket is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|err| TelemetryError::socket_error("local_addr", None, err))
    }
}

#[async_trait::async_trait]
impl Provider for UdpProvider {
    async fn next_packet(&mut self) -> Result<Option<FramePacket>> {
        let (len, source) = self.socket.recv_from(&mut self.buffer).await.map_err(|err| {
            TelemetryError::socket_error("receive", self.socket.local_addr().ok(), err)
        })?;

        if self.peers.insert(source) {
            debug!(%source, "UDP client connected");
        }

        self.sequence += 1;
        Ok(Some(FramePacket::new(self.buffer[..len].to_vec(), self.sequence, Some(source))))
    }
}

/// Preferred outbound IP of this machine.
///
/// Connecting a UDP socket sends nothing; it only asks the OS which local
/// interface would route to a public address. Returns `None` when there is
/// no route (for example on an offline machine).
pub fn outbound_ip() -> Option<IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("1.2.3.4:4321").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}
