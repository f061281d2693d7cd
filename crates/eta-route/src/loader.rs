//! CSV loaders for stops and driver positions.
//!
//! # Stops
//!
//! ```csv
//! stop_id,driver_id,sequence,latitude,longitude,planned_eta,customer_name
//! driver_001_stop_001,driver_001,1,25.2548,55.2708,2024-05-01T08:30:00Z,Customer_001
//! driver_001_stop_002,driver_001,2,25.2448,55.3208,2024-05-01T09:00:00Z,Customer_002
//! ```
//!
//! # Positions
//!
//! ```csv
//! driver_id,timestamp,latitude,longitude,speed,heading
//! driver_001,2024-05-01T08:00:00Z,25.2500,55.2650,38.2,71.0
//! ```
//!
//! `speed` and `heading` may be empty or absent.  Any other columns (the
//! upstream feed also sends `address`, `status`, `accuracy`) are ignored.
//! Timestamps are RFC 3339 or naive ISO-8601 (taken as UTC).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use eta_core::GeoPoint;
use eta_core::time::parse_timestamp;

use crate::{DriverPosition, RouteError, Stop};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StopRecord {
    stop_id:       String,
    driver_id:     String,
    sequence:      u32,
    latitude:      f64,
    longitude:     f64,
    planned_eta:   String,
    customer_name: String,
}

#[derive(Deserialize)]
struct PositionRecord {
    driver_id: String,
    timestamp: String,
    latitude:  f64,
    longitude: f64,
    #[serde(default)]
    speed:     Option<f64>,
    #[serde(default)]
    heading:   Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load all stops from a CSV file, in file order.
pub fn load_stops_csv(path: &Path) -> Result<Vec<Stop>, RouteError> {
    let file = std::fs::File::open(path).map_err(RouteError::Io)?;
    load_stops_reader(file)
}

/// Like [`load_stops_csv`] but accepts any `Read` source.
pub fn load_stops_reader<R: Read>(reader: R) -> Result<Vec<Stop>, RouteError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader
        .deserialize::<StopRecord>()
        .enumerate()
        .map(|(i, result)| {
            let r = result.map_err(|e| RouteError::Parse(e.to_string()))?;
            let planned_arrival = parse_timestamp(&r.planned_eta)
                .map_err(|e| RouteError::Parse(format!("stops row {}: {e}", i + 1)))?;
            Ok(Stop {
                stop_id:   r.stop_id.into(),
                driver_id: r.driver_id.into(),
                sequence:  r.sequence,
                location:  GeoPoint::new(r.latitude, r.longitude),
                planned_arrival,
                customer:  r.customer_name,
            })
        })
        .collect()
}

/// Load all driver positions from a CSV file, in file order.
pub fn load_positions_csv(path: &Path) -> Result<Vec<DriverPosition>, RouteError> {
    let file = std::fs::File::open(path).map_err(RouteError::Io)?;
    load_positions_reader(file)
}

/// Like [`load_positions_csv`] but accepts any `Read` source.
pub fn load_positions_reader<R: Read>(reader: R) -> Result<Vec<DriverPosition>, RouteError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader
        .deserialize::<PositionRecord>()
        .enumerate()
        .map(|(i, result)| {
            let r = result.map_err(|e| RouteError::Parse(e.to_string()))?;
            let observed_at = parse_timestamp(&r.timestamp)
                .map_err(|e| RouteError::Parse(format!("positions row {}: {e}", i + 1)))?;
            Ok(DriverPosition {
                driver_id:   r.driver_id.into(),
                location:    GeoPoint::new(r.latitude, r.longitude),
                observed_at,
                speed_kmh:   r.speed,
                heading_deg: r.heading,
            })
        })
        .collect()
}
