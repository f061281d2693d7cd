//! Unit tests for eta-alert.

use chrono::{TimeZone, Utc};

use eta_core::time::add_minutes;
use eta_core::{DriverId, GeoPoint, SeverityBands, StopId, Timestamp};
use eta_project::EtaProjection;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

/// A projection with the given delay, flagged with the default 15-minute
/// threshold.
fn proj(driver: &str, sequence: u32, delay_min: f64) -> EtaProjection {
    let planned = add_minutes(t0(), 30.0 * sequence as f64);
    EtaProjection {
        driver_id:          DriverId::from(driver),
        stop_id:            StopId::new(format!("{driver}_stop_{sequence:03}")),
        sequence,
        customer:           format!("Customer_{sequence:03}"),
        location:           GeoPoint::new(25.2, 55.27),
        distance_km:        4.0,
        travel_time_min:    6.0,
        service_time_min:   5.0,
        traffic_multiplier: 1.1,
        planned_arrival:    planned,
        projected_arrival:  add_minutes(planned, delay_min),
        delay_min,
        delayed:            delay_min > 15.0,
        avg_speed_kmh:      45.0,
    }
}

// ── Severity / classifier ─────────────────────────────────────────────────────

#[cfg(test)]
mod classify_tests {
    use super::*;
    use crate::{Severity, classify};

    #[test]
    fn band_boundaries_are_strict() {
        let bands = SeverityBands::default();
        assert_eq!(Severity::from_delay(30.0, &bands), Severity::Medium);
        assert_eq!(Severity::from_delay(30.01, &bands), Severity::High);
        assert_eq!(Severity::from_delay(20.0, &bands), Severity::Low);
        assert_eq!(Severity::from_delay(20.5, &bands), Severity::Medium);
    }

    #[test]
    fn worst_first() {
        let rows = vec![proj("d1", 1, 15.2), proj("d1", 2, 40.1), proj("d2", 1, 22.0)];
        let alerts = classify(&rows, &SeverityBands::default(), t0());
        let delays: Vec<f64> = alerts.iter().map(|a| a.delay_min()).collect();
        assert_eq!(delays, [40.1, 22.0, 15.2]);
        let sev: Vec<Severity> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(sev, [Severity::High, Severity::Medium, Severity::Low]);
    }

    #[test]
    fn explicit_delay_order() {
        // Flags set directly so a sub-threshold delay can still be classified.
        let mut rows = vec![proj("d1", 1, 5.2), proj("d1", 2, 40.1), proj("d1", 3, 22.0)];
        for r in &mut rows {
            r.delayed = true;
        }
        let alerts = classify(&rows, &SeverityBands::default(), t0());
        let delays: Vec<f64> = alerts.iter().map(|a| a.delay_min()).collect();
        assert_eq!(delays, [40.1, 22.0, 5.2]);
    }

    #[test]
    fn undelayed_rows_filtered() {
        let rows = vec![proj("d1", 1, -12.0), proj("d1", 2, 3.0), proj("d1", 3, 15.0)];
        assert!(classify(&rows, &SeverityBands::default(), t0()).is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(classify(&[], &SeverityBands::default(), t0()).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![proj("d2", 1, 25.0), proj("d1", 1, 25.0)];
        let alerts = classify(&rows, &SeverityBands::default(), t0());
        assert_eq!(alerts[0].projection.driver_id, DriverId::from("d2"));
        assert_eq!(alerts[1].projection.driver_id, DriverId::from("d1"));
    }

    #[test]
    fn custom_bands() {
        let bands = SeverityBands { medium_above_min: 10.0, high_above_min: 12.0 };
        assert_eq!(Severity::from_delay(12.5, &bands), Severity::High);
    }

    #[test]
    fn severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!(Severity::High.to_string(), "HIGH");
    }
}

// ── Summaries ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use super::*;
    use crate::{DelaySummary, FleetMetrics, RiskLevel, SeverityCounts, classify};

    #[test]
    fn metrics_over_all_stops() {
        let rows = vec![proj("d1", 1, -10.0), proj("d1", 2, 20.0), proj("d2", 1, 30.0), proj("d2", 2, 0.0)];
        let m = FleetMetrics::from_projections(&rows);
        assert_eq!(m.total_drivers, 2);
        assert_eq!(m.total_stops, 4);
        assert_eq!(m.delayed_stops, 2);
        assert_eq!(m.delay_rate_percent, 50.0);
        assert_eq!(m.on_time_rate_percent(), 50.0);
        assert_eq!(m.average_delay_min, 10.0);
        assert_eq!(m.max_delay_min, 30.0);
        assert_eq!(m.total_distance_km, 16.0);
        assert_eq!(m.average_speed_kmh, 45.0);
    }

    #[test]
    fn empty_metrics_are_zero() {
        let m = FleetMetrics::from_projections(&[]);
        assert_eq!(m.total_stops, 0);
        assert_eq!(m.max_delay_min, 0.0);
        assert_eq!(m.delay_rate_percent, 0.0);
    }

    #[test]
    fn top_n_is_worst_first_and_capped() {
        let rows: Vec<_> = (1..=8).map(|s| proj("d1", s, 15.0 + s as f64 * 3.0)).collect();
        let alerts = classify(&rows, &SeverityBands::default(), t0());
        let summary = DelaySummary::build(&rows, &alerts, 15.0, 5);
        assert_eq!(summary.top_delays.len(), 5);
        assert_eq!(summary.top_delays[0].sequence, 8);
        assert_eq!(summary.top_delays[4].sequence, 4);
        assert_eq!(summary.severity.total(), 8);
        assert!(summary.has_delays());
    }

    #[test]
    fn risk_levels() {
        assert_eq!(RiskLevel::assess(&SeverityCounts::default()), RiskLevel::Low);
        let medium = SeverityCounts { high: 0, medium: 0, low: 2 };
        assert_eq!(RiskLevel::assess(&medium), RiskLevel::Medium);
        let high = SeverityCounts { high: 1, medium: 0, low: 0 };
        assert_eq!(RiskLevel::assess(&high), RiskLevel::High);
    }

    #[test]
    fn risk_level_parse() {
        assert_eq!(RiskLevel::parse(" medium "), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("SEVERE"), None);
    }

    #[test]
    fn no_delays_summary() {
        let rows = vec![proj("d1", 1, -3.0)];
        let summary = DelaySummary::build(&rows, &[], 15.0, 5);
        assert!(!summary.has_delays());
        assert!(summary.top_delays.is_empty());
        assert_eq!(summary.risk_level(), RiskLevel::Low);
    }
}
