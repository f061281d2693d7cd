//! Input records: delivery stops and live driver positions.

use eta_core::{DriverId, GeoPoint, StopId, Timestamp};

/// One delivery point on a driver's route.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub stop_id:         StopId,
    pub driver_id:       DriverId,
    /// Visiting order within the driver's route, starting at 1.
    pub sequence:        u32,
    pub location:        GeoPoint,
    pub planned_arrival: Timestamp,
    pub customer:        String,
}

/// A single current-location observation for one driver.
///
/// `speed_kmh` and `heading_deg` are what the device reported; the projector
/// uses the configured average speed instead.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverPosition {
    pub driver_id:   DriverId,
    pub location:    GeoPoint,
    pub observed_at: Timestamp,
    pub speed_kmh:   Option<f64>,
    pub heading_deg: Option<f64>,
}

impl DriverPosition {
    pub fn new(driver_id: DriverId, location: GeoPoint, observed_at: Timestamp) -> Self {
        Self {
            driver_id,
            location,
            observed_at,
            speed_kmh: None,
            heading_deg: None,
        }
    }
}
