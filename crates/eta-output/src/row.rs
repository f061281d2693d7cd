//! Flat export rows.
//!
//! Values are rounded here and only here: distances and multipliers to two
//! decimals, minutes to one.  Timestamps are RFC 3339 strings.

use chrono::SecondsFormat;

use eta_alert::Alert;
use eta_core::Timestamp;
use eta_project::EtaProjection;

fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round() / scale
}

fn rfc3339(t: Timestamp) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One projected stop, as exported.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
    pub driver_id:          String,
    pub stop_id:            String,
    pub sequence:           u32,
    pub customer_name:      String,
    pub distance_km:        f64,
    pub travel_time_min:    f64,
    pub service_time_min:   f64,
    pub planned_eta:        String,
    pub calculated_eta:     String,
    pub delay_minutes:      f64,
    pub avg_speed_kmh:      f64,
    pub traffic_multiplier: f64,
    pub is_delayed:         bool,
    pub latitude:           f64,
    pub longitude:          f64,
}

impl ProjectionRow {
    pub const HEADER: [&'static str; 15] = [
        "driver_id",
        "stop_id",
        "sequence",
        "customer_name",
        "distance_km",
        "travel_time_min",
        "service_time_min",
        "planned_eta",
        "calculated_eta",
        "delay_minutes",
        "avg_speed_kmh",
        "traffic_multiplier",
        "is_delayed",
        "latitude",
        "longitude",
    ];

    pub fn record(&self) -> Vec<String> {
        vec![
            self.driver_id.clone(),
            self.stop_id.clone(),
            self.sequence.to_string(),
            self.customer_name.clone(),
            self.distance_km.to_string(),
            self.travel_time_min.to_string(),
            self.service_time_min.to_string(),
            self.planned_eta.clone(),
            self.calculated_eta.clone(),
            self.delay_minutes.to_string(),
            self.avg_speed_kmh.to_string(),
            self.traffic_multiplier.to_string(),
            self.is_delayed.to_string(),
            self.latitude.to_string(),
            self.longitude.to_string(),
        ]
    }
}

impl From<&EtaProjection> for ProjectionRow {
    fn from(p: &EtaProjection) -> Self {
        Self {
            driver_id:          p.driver_id.to_string(),
            stop_id:            p.stop_id.to_string(),
            sequence:           p.sequence,
            customer_name:      p.customer.clone(),
            distance_km:        round_to(p.distance_km, 2),
            travel_time_min:    round_to(p.travel_time_min, 1),
            service_time_min:   round_to(p.service_time_min, 1),
            planned_eta:        rfc3339(p.planned_arrival),
            calculated_eta:     rfc3339(p.projected_arrival),
            delay_minutes:      round_to(p.delay_min, 1),
            avg_speed_kmh:      p.avg_speed_kmh,
            traffic_multiplier: round_to(p.traffic_multiplier, 2),
            is_delayed:         p.delayed,
            latitude:           p.location.lat,
            longitude:          p.location.lon,
        }
    }
}

/// A delayed stop with its severity, as exported.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRow {
    pub projection:      ProjectionRow,
    pub alert_severity:  String,
    pub alert_timestamp: String,
}

impl AlertRow {
    pub fn header() -> Vec<&'static str> {
        let mut h = ProjectionRow::HEADER.to_vec();
        h.extend(["alert_severity", "alert_timestamp"]);
        h
    }

    pub fn record(&self) -> Vec<String> {
        let mut r = self.projection.record();
        r.push(self.alert_severity.clone());
        r.push(self.alert_timestamp.clone());
        r
    }
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            projection:      ProjectionRow::from(&a.projection),
            alert_severity:  a.severity.to_string(),
            alert_timestamp: rfc3339(a.raised_at),
        }
    }
}
