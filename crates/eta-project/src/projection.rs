//! The projector's output record.

use serde::Serialize;

use eta_core::time::add_minutes;
use eta_core::{DriverId, GeoPoint, StopId, Timestamp};

/// Projected arrival at one stop.
///
/// Fields are kept at full precision; rounding is a presentation concern.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EtaProjection {
    pub driver_id:          DriverId,
    pub stop_id:            StopId,
    pub sequence:           u32,
    pub customer:           String,
    pub location:           GeoPoint,
    /// Length of the leg ending at this stop, km.
    pub distance_km:        f64,
    /// Time to drive the leg, traffic included, minutes.
    pub travel_time_min:    f64,
    /// Dwell at this stop before the next leg, minutes.
    pub service_time_min:   f64,
    pub traffic_multiplier: f64,
    pub planned_arrival:    Timestamp,
    pub projected_arrival:  Timestamp,
    /// `projected_arrival − planned_arrival` in minutes; negative is early.
    pub delay_min:          f64,
    /// `delay_min` strictly exceeds the configured threshold.
    pub delayed:            bool,
    pub avg_speed_kmh:      f64,
}

impl EtaProjection {
    /// When the driver leaves this stop for the next one.
    pub fn projected_departure(&self) -> Timestamp {
        add_minutes(self.projected_arrival, self.service_time_min)
    }

    #[inline]
    pub fn is_early(&self) -> bool {
        self.delay_min < 0.0
    }
}

/// Travel time in minutes for one leg.
///
/// `(distance / speed) × traffic × 60`.  A non-positive speed is a defined
/// degenerate case and yields `0.0`.
#[inline]
pub fn travel_time_minutes(distance_km: f64, speed_kmh: f64, traffic_multiplier: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }
    distance_km / speed_kmh * traffic_multiplier * 60.0
}
