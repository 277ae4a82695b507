//! Packet Format Discovery
//!
//! This module turns packet format files into [`PacketSchema`] values.
//!
//! # Architecture
//!
//! - [`loader`] parses the line-oriented format files and assigns byte ranges
//! - [`PacketFormat`] selects between the two known game wire formats
//!
//! Both known formats ship in `formats/` and are also compiled into the crate,
//! so the tool works from any directory. Use [`loader::load`] for a custom file.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::{PacketSchema, Result};

pub use loader::{load, parse_schema};

const MOTORSPORT_FORMAT: &str = include_str!("../../formats/FM7_packetformat.dat");
const HORIZON_FORMAT: &str = include_str!("../../formats/FH4_packetformat.dat");

/// Known "Data Out" wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PacketFormat {
    /// Forza Motorsport "Dash" format
    #[default]
    Motorsport,
    /// Forza Horizon format, the Motorsport layout with 12 reserved bytes inserted
    Horizon,
}

impl PacketFormat {
    /// File name of the bundled format definition.
    pub const fn file_name(&self) -> &'static str {
        match self {
            PacketFormat::Motorsport => "FM7_packetformat.dat",
            PacketFormat::Horizon => "FH4_packetformat.dat",
        }
    }

    /// Bundled format definition text.
    pub const fn definition(&self) -> &'static str {
        match self {
            PacketFormat::Motorsport => MOTORSPORT_FORMAT,
            PacketFormat::Horizon => HORIZON_FORMAT,
        }
    }

    /// Parse the bundled definition.
    pub fn schema(&self) -> Result<PacketSchema> {
        parse_schema(self.definition(), Some(PathBuf::from(self.file_name())))
    }
}

impl fmt::Display for PacketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketFormat::Motorsport => f.write_str("Forza Motorsport"),
            PacketFormat::Horizon => f.write_str("Forza Horizon"),
        }
    }
}
