//! Integration tests for eta-output.

use chrono::{TimeZone, Utc};

use eta_alert::{Alert, DelaySummary, classify};
use eta_comms::{Communications, Communicator, TemplateGenerator};
use eta_core::time::add_minutes;
use eta_core::{DriverId, EtaConfig, GeoPoint, StopId, Timestamp};
use eta_project::EtaProjection;

use crate::RunSummary;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

fn proj(driver: &str, sequence: u32, delay_min: f64) -> EtaProjection {
    let planned = add_minutes(t0(), 30.0 * sequence as f64);
    EtaProjection {
        driver_id:          DriverId::from(driver),
        stop_id:            StopId::new(format!("{driver}_stop_{sequence:03}")),
        sequence,
        customer:           format!("Customer, {sequence:03}"),
        location:           GeoPoint::new(25.2, 55.27),
        distance_km:        4.236,
        travel_time_min:    6.6666,
        service_time_min:   5.0,
        traffic_multiplier: 1.234,
        planned_arrival:    planned,
        projected_arrival:  add_minutes(planned, delay_min),
        delay_min,
        delayed:            delay_min > 15.0,
        avg_speed_kmh:      45.0,
    }
}

struct Run {
    projections: Vec<EtaProjection>,
    alerts:      Vec<Alert>,
    summary:     RunSummary,
    comms:       Communications,
}

fn run(delays: &[f64]) -> Run {
    let config = EtaConfig::default();
    let projections: Vec<_> = delays
        .iter()
        .enumerate()
        .map(|(i, &d)| proj("driver_001", i as u32 + 1, d))
        .collect();
    let alerts = classify(&projections, &config.severity, t0());
    let delay_summary = DelaySummary::build(&projections, &alerts, config.delay_threshold_min, config.top_n);
    let comms = Communicator::new(TemplateGenerator).communicate(&delay_summary, &alerts, t0());
    let summary = RunSummary::new(t0(), &config, &delay_summary, Some(&comms), &[]);
    Run { projections, alerts, summary, comms }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;
    use crate::{AlertRow, ProjectionRow};

    #[test]
    fn projection_row_rounds_for_display() {
        let row = ProjectionRow::from(&proj("driver_001", 1, 16.04));
        assert_eq!(row.distance_km, 4.24);
        assert_eq!(row.travel_time_min, 6.7);
        assert_eq!(row.delay_minutes, 16.0);
        assert_eq!(row.traffic_multiplier, 1.23);
        assert!(row.is_delayed);
        assert_eq!(row.planned_eta, "2024-05-01T08:30:00Z");
        assert_eq!(row.record().len(), ProjectionRow::HEADER.len());
    }

    #[test]
    fn alert_row_appends_severity() {
        let r = run(&[35.0]);
        let row = AlertRow::from(&r.alerts[0]);
        assert_eq!(row.alert_severity, "HIGH");
        assert_eq!(row.alert_timestamp, "2024-05-01T08:00:00Z");
        assert_eq!(row.record().len(), AlertRow::header().len());
        assert_eq!(AlertRow::header().last(), Some(&"alert_timestamp"));
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::{CsvWriter, OutputPaths};
    use crate::row::{AlertRow, ProjectionRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn stamped_names() {
        let paths = OutputPaths::new(std::path::Path::new("out"), Some("20240501_080000"));
        assert!(paths.projections.ends_with("eta_results_20240501_080000.csv"));
        assert!(paths.alerts.ends_with("delivery_alerts_20240501_080000.csv"));
        assert!(paths.summary.ends_with("eta_summary_20240501_080000.json"));
        assert!(paths.communications.ends_with("llm_communications_20240501_080000.json"));
        let plain = OutputPaths::new(std::path::Path::new("out"), None);
        assert!(plain.projections.ends_with("eta_results.csv"));
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let w = CsvWriter::new(&nested, None).unwrap();
        assert!(w.paths().projections.exists());
    }

    #[test]
    fn headers_written_without_alerts() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), None).unwrap();
        w.write_alerts(&[]).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&w.paths().projections), ProjectionRow::HEADER);
        assert_eq!(headers(&w.paths().alerts), AlertRow::header());
        let mut rdr = csv::Reader::from_path(&w.paths().alerts).unwrap();
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn full_run_written() {
        let dir = tmp();
        let r = run(&[40.0, -3.0, 22.0]);
        let mut w = CsvWriter::new(dir.path(), Some("x")).unwrap();
        w.write_projections(&r.projections).unwrap();
        w.write_alerts(&r.alerts).unwrap();
        w.write_summary(&r.summary).unwrap();
        w.write_communications(&r.comms).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&w.paths().projections).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][3], "Customer, 001"); // quoted comma survives

        let mut rdr = csv::Reader::from_path(&w.paths().alerts).unwrap();
        let alerts: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(alerts.len(), 2);
        assert_eq!(&alerts[0][9], "40"); // worst first
        assert_eq!(&alerts[0][15], "HIGH");

        let summary: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&w.paths().summary).unwrap()).unwrap();
        assert_eq!(summary["metrics"]["delayed_stops"], 2);
        assert_eq!(summary["alerts"]["high"], 1);
        assert_eq!(summary["risk_level"], "HIGH");
        assert_eq!(summary["communications"]["customer_messages_generated"], 2);
        assert!(summary["configuration"].get("comms").is_none());

        let comms: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&w.paths().communications).unwrap()).unwrap();
        assert_eq!(comms["customer_messages"].as_array().unwrap().len(), 2);
        assert_eq!(comms["supervisor_report"]["risk_level"], "HIGH");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), None).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use chrono::Duration;

    use eta_project::ProjectorBuilder;
    use eta_route::{DriverPosition, Stop};
    use eta_traffic::{FixedService, FixedTraffic};

    use super::*;
    use crate::{CsvWriter, ExportObserver, OutputWriter};

    fn stops(driver: &str, n: u32) -> Vec<Stop> {
        (1..=n)
            .map(|seq| Stop {
                stop_id:         StopId::new(format!("{driver}_{seq}")),
                driver_id:       DriverId::from(driver),
                sequence:        seq,
                location:        GeoPoint::new(25.2 + seq as f64 * 0.01, 55.27),
                planned_arrival: t0() + Duration::minutes(15 * seq as i64),
                customer:        format!("Customer_{seq}"),
            })
            .collect()
    }

    #[test]
    fn streams_every_projection() {
        let dir = tempfile::tempdir().unwrap();
        let projector =
            ProjectorBuilder::new(EtaConfig::default(), FixedTraffic(1.0), FixedService(5.0))
                .build()
                .unwrap();
        let positions = vec![
            DriverPosition::new(DriverId::from("driver_001"), GeoPoint::new(25.2, 55.27), t0()),
            DriverPosition::new(DriverId::from("driver_002"), GeoPoint::new(25.2, 55.27), t0()),
        ];
        let mut all = stops("driver_001", 3);
        all.extend(stops("driver_002", 2));

        let mut obs = ExportObserver::new(CsvWriter::new(dir.path(), None).unwrap());
        let fleet = projector.project_all(positions, all, &mut obs);
        assert!(obs.take_error().is_none());
        assert_eq!(obs.rows_written(), 5);
        assert_eq!(fleet.projections.len(), 5);

        let mut writer = obs.into_writer();
        writer.finish().unwrap();
        let mut rdr = csv::Reader::from_path(&writer.paths().projections).unwrap();
        assert_eq!(rdr.records().count(), 5);
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn failures_are_listed() {
        use eta_project::{DriverFailure, ProjectError};

        let config = EtaConfig::default();
        let failure = DriverFailure {
            driver_id: DriverId::from("driver_009"),
            error:     ProjectError::MissingPosition(DriverId::from("driver_009")),
        };
        let empty = DelaySummary::build(&[], &[], 15.0, 5);
        let s = RunSummary::new(t0(), &config, &empty, None, &[failure]);
        assert_eq!(s.failed_drivers.len(), 1);
        assert_eq!(s.failed_drivers[0].driver_id, "driver_009");
        assert!(s.failed_drivers[0].reason.contains("no position"));
        assert_eq!(s.risk_level, "LOW");
        assert!(s.communications.is_none());
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path(), "run1").unwrap();
        assert!(dir.path().join("eta.db").exists());
    }

    #[test]
    fn sqlite_full_run() {
        let dir = tmp();
        let r = run(&[40.0, 2.0, 22.0, 18.0]);
        let mut w = SqliteWriter::new(dir.path(), "run1").unwrap();
        w.write_projections(&r.projections).unwrap();
        w.write_alerts(&r.alerts).unwrap();
        w.write_summary(&r.summary).unwrap();
        w.write_communications(&r.comms).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("eta.db")).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM eta_projections WHERE run_id = 'run1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 4);

        let worst: String = conn
            .query_row("SELECT alert_severity FROM delivery_alerts WHERE alert_rank = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(worst, "HIGH");

        let (delayed, comms): (i64, Option<String>) = conn
            .query_row(
                "SELECT delayed_stops, communications_json FROM run_summaries WHERE run_id = 'run1'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(delayed, 3);
        assert!(comms.unwrap().contains("supervisor_report"));
    }

    #[test]
    fn sqlite_delayed_flag_as_integer() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path(), "r").unwrap();
        w.write_projections(&[proj("driver_001", 1, 20.0)]).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("eta.db")).unwrap();
        let flag: i64 = conn
            .query_row("SELECT is_delayed FROM eta_projections", [], |r| r.get(0))
            .unwrap();
        assert_eq!(flag, 1);
    }
}
