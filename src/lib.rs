//! Schema-driven decoder for Forza "Data Out" UDP telemetry.
//!
//! The game broadcasts one fixed-layout binary record per UDP datagram. This
//! crate loads a packet format file describing that layout, decodes every
//! datagram into typed values, and feeds the result to optional sinks.
//!
//! # Features
//!
//! - **Packet formats**: bundled Motorsport and Horizon layouts, or any custom file
//! - **Type Safety**: six strongly typed value maps per frame
//! - **Sinks**: realtime console line, CSV log, snapshot log, HTTP JSON snapshot
//! - **Session summary**: statistics computed from the CSV log at shutdown
//!
//! ## Example (decode a single datagram)
//!
//! ```rust
//! use forza_telemetry::{decode, parse_schema};
//!
//! let schema = parse_schema("u8 Gear\nf32 Power\n", None)?;
//! let frame = decode(&schema, &[3, 0x00, 0x00, 0x48, 0x43])?;
//!
//! assert_eq!(frame.u8["Gear"], 3);
//! assert_eq!(frame.f32["Power"], 200.0);
//! # Ok::<(), forza_telemetry::TelemetryError>(())
//! ```

// Core types and error handling
pub mod attitude;
pub mod config;
pub mod decoder;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Datagram processing
pub mod driver;
pub mod provider;
pub mod providers;
pub mod schema;
pub mod sinks;

// Outputs
pub mod http;
pub mod stats;

// Core exports
pub use attitude::Attitude;
pub use config::Config;
pub use decoder::decode;
pub use error::*;
pub use types::*;

// Schema exports
pub use schema::{PacketFormat, load, parse_schema};

pub use driver::{Driver, DriverStats};
pub use stats::SessionStats;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::http::SnapshotServer;
use crate::providers::{UdpProvider, outbound_ip};
use crate::sinks::{Sinks, snapshot_slot};

/// Outcome of a completed [`Telemetry::run`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Decode loop counters
    pub driver: DriverStats,
    /// Statistics read back from the CSV log, when CSV logging was enabled
    pub session: Option<SessionStats>,
}

/// Unified entry point: a bound listener with its schema and sinks.
///
/// [`Telemetry::start`] does all the fallible setup (schema, files, sockets)
/// so configuration problems surface before any datagram is read;
/// [`Telemetry::run`] then drives the decode loop until cancelled.
///
/// ```rust,no_run
/// use forza_telemetry::{Config, Telemetry};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> forza_telemetry::Result<()> {
///     let telemetry = Telemetry::start(Config::default()).await?;
///     let summary = telemetry.run(CancellationToken::new()).await?;
///     println!("{} frames published", summary.driver.published);
///     Ok(())
/// }
/// ```
pub struct Telemetry {
    driver: Driver,
    provider: UdpProvider,
    server: Option<SnapshotServer>,
    csv_path: Option<PathBuf>,
}

impl Telemetry {
    /// Load the schema, create the sinks and bind the sockets.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is contradictory
    /// - The packet format file cannot be read or contains an unknown type
    /// - A log file cannot be created
    /// - The UDP or HTTP address cannot be bound
    pub async fn start(config: Config) -> Result<Self> {
        config.validate()?;

        info!("{} mode selected", config.format);
        info!("Processing {}...", config.schema_label());
        let schema = Arc::new(config.load_schema()?);
        info!(
            "Processed {} telemetry types OK ({} bytes per datagram)",
            schema.field_count(),
            schema.packet_size
        );

        let (publisher, reader) = match config.http_addr {
            Some(_) => {
                let (publisher, reader) = snapshot_slot();
                (Some(publisher), Some(reader))
            }
            None => (None, None),
        };

        let sinks = Sinks::from_config(&config, &schema, publisher)?;

        let server = match (config.http_addr, reader) {
            (Some(addr), Some(reader)) => Some(SnapshotServer::bind(addr, reader).await?),
            _ => None,
        };

        let provider = UdpProvider::bind(config.udp_addr).await?;
        let port = provider.local_addr()?.port();
        match outbound_ip() {
            Some(ip) => info!("Data out server listening on {}:{}, waiting for Forza data...", ip, port),
            None => warn!("Could not determine outbound IP; listening on port {}", port),
        }

        Ok(Self {
            driver: Driver::new(schema, sinks),
            provider,
            server,
            csv_path: config.csv_path,
        })
    }

    /// Address the UDP listener is bound to.
    pub fn udp_addr(&self) -> Result<SocketAddr> {
        self.provider.local_addr()
    }

    /// Address the HTTP server is bound to, when enabled.
    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().and_then(|server| server.local_addr().ok())
    }

    /// Decode datagrams until `cancel` fires or a fatal error occurs.
    ///
    /// On a clean stop with CSV logging enabled, the log is read back and
    /// summarised.
    pub async fn run(self, cancel: CancellationToken) -> Result<RunSummary> {
        let Telemetry { mut driver, provider, server, csv_path } = self;

        let server_cancel = cancel.child_token();
        let server_task = server.map(|server| tokio::spawn(server.serve(server_cancel.clone())));

        let result = driver.run(provider, cancel).await;

        server_cancel.cancel();
        if let Some(task) = server_task {
            join_server(task).await;
        }

        let driver_stats = result?;
        info!(
            received = driver_stats.received,
            published = driver_stats.published,
            idle = driver_stats.idle,
            malformed = driver_stats.malformed,
            "Telemetry stopped"
        );

        let session = match csv_path {
            Some(path) => Some(SessionStats::from_csv(path)?),
            None => None,
        };

        Ok(RunSummary { driver: driver_stats, session })
    }
}

/// Wait for the HTTP server task and log how it ended. Returns whether it stopped cleanly.
async fn join_server(task: JoinHandle<Result<()>>) -> bool {
    match task.await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("JSON server stopped with an error: {}", e);
            false
        }
        Err(e) => {
            warn!("JSON server task failed: {}", e);
            false
        }
    }
}
