//! Runtime configuration.
//!
//! A [`Config`] is built once at startup (by the command line front end or
//! by a library caller) and passed down; every sink toggle is an explicit
//! field rather than something inferred from which flags were typed.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::schema::{self, PacketFormat};
use crate::{PacketSchema, Result, TelemetryError};

/// Default UDP port the game is pointed at.
pub const DEFAULT_UDP_PORT: u16 = 9999;
/// Default port of the HTTP snapshot server.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Bundled wire format to decode
    pub format: PacketFormat,
    /// Custom packet format file; overrides `format`
    pub schema_path: Option<PathBuf>,
    /// Address the UDP listener binds to
    pub udp_addr: SocketAddr,
    /// Print the realtime dashboard line
    pub console: bool,
    /// CSV log destination
    pub csv_path: Option<PathBuf>,
    /// Snapshot log destination
    pub json_log_path: Option<PathBuf>,
    /// HTTP snapshot server address; `None` disables the server
    pub http_addr: Option<SocketAddr>,
    /// Verbose logging
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: PacketFormat::default(),
            schema_path: None,
            udp_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_UDP_PORT)),
            console: true,
            csv_path: None,
            json_log_path: None,
            http_addr: None,
            debug: false,
        }
    }
}

impl Config {
    /// Reject option combinations that cannot work together.
    pub fn validate(&self) -> Result<()> {
        if let (Some(csv), Some(json)) = (&self.csv_path, &self.json_log_path) {
            if csv == json {
                return Err(TelemetryError::config_error(format!(
                    "CSV log and JSON log both write to {}",
                    csv.display()
                )));
            }
        }

        Ok(())
    }

    /// Load the schema this configuration selects.
    pub fn load_schema(&self) -> Result<PacketSchema> {
        match &self.schema_path {
            Some(path) => schema::load(path),
            None => self.format.schema(),
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Human-readable name of the selected schema.
    pub fn schema_label(&self) -> String {
        match &self.schema_path {
            Some(path) => path.display().to_string(),
            None => self.format.file_name().to_string(),
        }
    }
}
