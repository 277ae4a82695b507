//! Error types for telemetry processing.
//!
//! This module provides the error taxonomy for the decoder and its sinks.
//! All errors implement the `std::error::Error` trait and carry enough context
//! (file path, line number, byte counts) to diagnose a bad schema or datagram.
//!
//! ## Error Categories
//!
//! - **Schema Errors**: Unknown type tokens or malformed lines in a packet format file
//! - **File Errors**: Problems reading schema files or writing CSV/JSON logs
//! - **Decode Errors**: Datagrams shorter than the loaded schema
//! - **Socket Errors**: UDP bind/receive or HTTP listener failures
//! - **Config Errors**: Contradictory command-line options
//!
//! ## Recovery
//!
//! Only a short datagram is recoverable; the decode loop skips it and keeps
//! listening. Everything else terminates the process.
//!
//! ```rust
//! use forza_telemetry::TelemetryError;
//!
//! let error = TelemetryError::short_packet(311, 232);
//! assert!(error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```
//!
//! ## Helper Constructors
//!
//! ```rust
//! use forza_telemetry::TelemetryError;
//! use std::path::PathBuf;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
//! let file_error = TelemetryError::file_error(PathBuf::from("FM7_packetformat.dat"), io_err);
//!
//! let schema_error = TelemetryError::unknown_type(Some(PathBuf::from("custom.dat")), 3, "u64");
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Schema error in {} line {line}: {details}", display_path(.path))]
    Schema { path: Option<PathBuf>, line: usize, details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Datagram too short: schema needs {expected} bytes, received {actual}")]
    ShortPacket { expected: usize, actual: usize },

    #[error("Socket error during {operation}{}", display_addr(.addr))]
    Socket {
        operation: String,
        addr: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization failed")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {details}")]
    Config { details: String },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<inline schema>".to_string(),
    }
}

fn display_addr(addr: &Option<SocketAddr>) -> String {
    match addr {
        Some(addr) => format!(" on {}", addr),
        None => String::new(),
    }
}

impl TelemetryError {
    /// Returns whether the decode loop can drop the offending datagram and continue.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::ShortPacket { .. } => true,
            TelemetryError::Schema { .. } => false,
            TelemetryError::File { .. } => false,
            TelemetryError::Socket { .. } => false,
            TelemetryError::Serialization { .. } => false,
            TelemetryError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::Schema { .. } => vec![
                "Use one of the type tokens s32, u32, f32, u16, u8, s8 or hzn",
                "Give every line a field name after the type token",
                "Start trailing comments with ';'",
            ],
            TelemetryError::File { .. } => vec![
                "Check file exists and is readable",
                "Check the target directory exists and is writable",
                "Ensure sufficient disk space",
            ],
            TelemetryError::ShortPacket { .. } => vec![
                "Check the game's Data Out format matches the selected schema",
                "Use --horizon for Forza Horizon and omit it for Forza Motorsport",
            ],
            TelemetryError::Socket { .. } => vec![
                "Check no other process is bound to the same port",
                "Verify the bind address belongs to this machine",
                "Check firewall rules for inbound UDP",
            ],
            TelemetryError::Serialization { .. } => vec![
                "Check decoded values are representable as JSON",
            ],
            TelemetryError::Config { .. } => vec![
                "Run with --help to review the available options",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }

    /// Helper constructor for an unrecognised schema type token.
    pub fn unknown_type(path: Option<PathBuf>, line: usize, token: &str) -> Self {
        TelemetryError::Schema { path, line, details: format!("unknown data type '{}'", token) }
    }

    /// Helper constructor for a schema line that has a type but no field name.
    pub fn missing_name(path: Option<PathBuf>, line: usize, token: &str) -> Self {
        TelemetryError::Schema {
            path,
            line,
            details: format!("type '{}' is not followed by a field name", token),
        }
    }

    /// Helper constructor for datagrams shorter than the schema.
    pub fn short_packet(expected: usize, actual: usize) -> Self {
        TelemetryError::ShortPacket { expected, actual }
    }

    /// Helper constructor for socket errors.
    pub fn socket_error(
        operation: impl Into<String>,
        addr: Option<SocketAddr>,
        source: std::io::Error,
    ) -> Self {
        TelemetryError::Socket { operation: operation.into(), addr, source }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(details: impl Into<String>) -> Self {
        TelemetryError::Config { details: details.into() }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_json::Error> for TelemetryError {
    fn from(err: serde_json::Error) -> Self {
        TelemetryError::Serialization { source: err }
    }
}
