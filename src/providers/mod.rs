//! Datagram source implementations

pub mod udp;

pub use udp::{UdpProvider, outbound_ip};
