//! Session summary computed from a CSV log.
//!
//! Read back at shutdown, so the numbers describe exactly what was logged.
//! Columns with an empty or unparsable cell (reserved regions, for example)
//! are left out. `NaN` and infinite cells are skipped individually and do not
//! disqualify their column.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::{Result, TelemetryError};

/// Watts per mechanical horsepower.
const WATTS_PER_BHP: f64 = 745.7;
/// Metres per second to miles per hour.
const MPS_TO_MPH: f64 = 2.237;

/// Min, max and mean of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Finite cells the figures are computed from
    pub samples: usize,
}

/// Summary of a whole CSV log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    /// Data rows, header excluded
    pub rows: usize,
    /// Numeric columns in header order
    pub columns: Vec<ColumnStats>,
}

struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    samples: usize,
    numeric: bool,
}

impl SessionStats {
    /// Read and summarise a CSV log written by [`crate::sinks::CsvLogger`].
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| TelemetryError::file_error(path.to_path_buf(), err))?;
        Ok(Self::from_csv_str(&text))
    }

    /// Summarise CSV text: a header line followed by data rows.
    pub fn from_csv_str(text: &str) -> Self {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let Some(header) = lines.next() else {
            return Self::default();
        };

        let names: Vec<&str> = header.split(',').collect();
        let mut accumulators: Vec<Accumulator> = names
            .iter()
            .map(|_| Accumulator {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                sum: 0.0,
                samples: 0,
                numeric: true,
            })
            .collect();

        let mut rows = 0usize;
        for line in lines {
            rows += 1;
            for (cell, acc) in line.split(',').zip(accumulators.iter_mut()) {
                match cell.trim().parse::<f64>() {
                    Ok(value) if value.is_finite() => {
                        acc.min = acc.min.min(value);
                        acc.max = acc.max.max(value);
                        acc.sum += value;
                        acc.samples += 1;
                    }
                    Ok(_) => {}
                    Err(_) => acc.numeric = false,
                }
            }
        }

        let columns = if rows == 0 {
            Vec::new()
        } else {
            names
                .into_iter()
                .zip(accumulators)
                .filter(|(_, acc)| acc.numeric && acc.samples > 0)
                .map(|(name, acc)| ColumnStats {
                    name: name.to_string(),
                    min: acc.min,
                    max: acc.max,
                    mean: acc.sum / acc.samples as f64,
                    samples: acc.samples,
                })
                .collect()
        };

        Self { rows, columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session summary")?;
        if let Some(speed) = self.column("Speed") {
            writeln!(
                f,
                "  Top speed:     {:.0} mph (avg {:.0} mph)",
                speed.max * MPS_TO_MPH,
                speed.mean * MPS_TO_MPH
            )?;
        }
        if let Some(rpm) = self.column("CurrentEngineRpm") {
            writeln!(f, "  Max RPM:       {:.0} (avg {:.0})", rpm.max, rpm.mean)?;
        }
        if let Some(power) = self.column("Power") {
            writeln!(f, "  Peak power:    {:.0} BHP", power.max / WATTS_PER_BHP)?;
        }
        if let Some(torque) = self.column("Torque") {
            writeln!(f, "  Peak torque:   {:.0} Nm", torque.max)?;
        }
        write!(f, "  Rows logged:   {}", self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "CurrentEngineRpm,HorizonReserved,Speed,Power,Gear\n\
                       6000,,40,223710,3\n\
                       8000,,50,149140,4\n";

    #[test]
    fn numeric_columns_are_summarised() {
        let stats = SessionStats::from_csv_str(LOG);

        assert_eq!(stats.rows, 2);
        let names: Vec<_> = stats.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["CurrentEngineRpm", "Speed", "Power", "Gear"]);

        let rpm = stats.column("CurrentEngineRpm").unwrap();
        assert_eq!((rpm.min, rpm.max, rpm.mean), (6000.0, 8000.0, 7000.0));
        assert_eq!(stats.column("Gear").unwrap().mean, 3.5);
    }

    #[test]
    fn report_highlights_key_columns() {
        let report = SessionStats::from_csv_str(LOG).to_string();

        assert!(report.contains("Top speed:     112 mph"));
        assert!(report.contains("Max RPM:       8000"));
        assert!(report.contains("Peak power:    300 BHP"));
        assert!(!report.contains("Peak torque"));
        assert!(report.ends_with("Rows logged:   2"));
    }

    #[test]
    fn non_finite_cells_are_skipped_not_fatal() {
        let stats = SessionStats::from_csv_str("Speed,Gear\n40,3\nNaN,4\n50,4\ninf,5\n");

        assert_eq!(stats.rows, 4);
        let speed = stats.column("Speed").unwrap();
        assert_eq!((speed.min, speed.max, speed.mean, speed.samples), (40.0, 50.0, 45.0, 2));
        assert_eq!(stats.column("Gear").unwrap().samples, 4);
    }

    #[test]
    fn column_without_finite_cells_is_left_out() {
        let stats = SessionStats::from_csv_str("Speed,Gear\nNaN,3\nNaN,4\n");
        assert!(stats.column("Speed").is_none());
        assert!(stats.column("Gear").is_some());
    }

    #[test]
    fn header_only_log_has_no_columns() {
        let stats = SessionStats::from_csv_str("Gear,Speed\n");
        assert_eq!(stats, SessionStats { rows: 0, columns: Vec::new() });
        assert!(SessionStats::from_csv_str("").columns.is_empty());
    }

    #[test]
    fn reads_log_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.csv");
        std::fs::write(&path, LOG).unwrap();

        assert_eq!(SessionStats::from_csv(&path).unwrap().rows, 2);
        assert!(SessionStats::from_csv(dir.path().join("missing.csv")).is_err());
    }
}
