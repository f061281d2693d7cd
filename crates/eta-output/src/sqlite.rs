//! SQLite output backend (feature `sqlite`).
//!
//! Appends to a single `eta.db` file in the configured output directory with
//! three tables: `eta_projections`, `delivery_alerts`, and `run_summaries`.
//! Every row carries the writer's `run_id`, so one database can hold many
//! runs.

use std::path::Path;

use rusqlite::{Connection, params};

use eta_alert::Alert;
use eta_comms::Communications;
use eta_project::EtaProjection;

use crate::writer::OutputWriter;
use crate::{AlertRow, OutputResult, ProjectionRow, RunSummary};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    run_id:   String,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `eta.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path, run_id: &str) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("eta.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS eta_projections (
                 run_id             TEXT    NOT NULL,
                 driver_id          TEXT    NOT NULL,
                 stop_id            TEXT    NOT NULL,
                 sequence           INTEGER NOT NULL,
                 customer_name      TEXT    NOT NULL,
                 distance_km        REAL    NOT NULL,
                 travel_time_min    REAL    NOT NULL,
                 service_time_min   REAL    NOT NULL,
                 planned_eta        TEXT    NOT NULL,
                 calculated_eta     TEXT    NOT NULL,
                 delay_minutes      REAL    NOT NULL,
                 avg_speed_kmh      REAL    NOT NULL,
                 traffic_multiplier REAL    NOT NULL,
                 is_delayed         INTEGER NOT NULL,
                 latitude           REAL    NOT NULL,
                 longitude          REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS delivery_alerts (
                 run_id          TEXT    NOT NULL,
                 alert_rank      INTEGER NOT NULL,
                 driver_id       TEXT    NOT NULL,
                 stop_id         TEXT    NOT NULL,
                 sequence        INTEGER NOT NULL,
                 customer_name   TEXT    NOT NULL,
                 delay_minutes   REAL    NOT NULL,
                 alert_severity  TEXT    NOT NULL,
                 alert_timestamp TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS run_summaries (
                 run_id              TEXT PRIMARY KEY,
                 run_timestamp       TEXT    NOT NULL,
                 total_drivers       INTEGER NOT NULL,
                 total_stops         INTEGER NOT NULL,
                 delayed_stops       INTEGER NOT NULL,
                 risk_level          TEXT    NOT NULL,
                 summary_json        TEXT    NOT NULL,
                 communications_json TEXT
             );",
        )?;

        Ok(Self { conn, run_id: run_id.to_owned(), finished: false })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl OutputWriter for SqliteWriter {
    fn write_projections(&mut self, rows: &[EtaProjection]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO eta_projections \
                 (run_id, driver_id, stop_id, sequence, customer_name, distance_km, \
                  travel_time_min, service_time_min, planned_eta, calculated_eta, \
                  delay_minutes, avg_speed_kmh, traffic_multiplier, is_delayed, \
                  latitude, longitude) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            for p in rows {
                let r = ProjectionRow::from(p);
                stmt.execute(params![
                    self.run_id,
                    r.driver_id,
                    r.stop_id,
                    r.sequence,
                    r.customer_name,
                    r.distance_km,
                    r.travel_time_min,
                    r.service_time_min,
                    r.planned_eta,
                    r.calculated_eta,
                    r.delay_minutes,
                    r.avg_speed_kmh,
                    r.traffic_multiplier,
                    r.is_delayed as i64,
                    r.latitude,
                    r.longitude,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_alerts(&mut self, alerts: &[Alert]) -> OutputResult<()> {
        if alerts.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO delivery_alerts \
                 (run_id, alert_rank, driver_id, stop_id, sequence, customer_name, \
                  delay_minutes, alert_severity, alert_timestamp) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (rank, alert) in alerts.iter().enumerate() {
                let r = AlertRow::from(alert);
                stmt.execute(params![
                    self.run_id,
                    rank as i64 + 1,
                    r.projection.driver_id,
                    r.projection.stop_id,
                    r.projection.sequence,
                    r.projection.customer_name,
                    r.projection.delay_minutes,
                    r.alert_severity,
                    r.alert_timestamp,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()> {
        let json = serde_json::to_string(summary)?;
        self.conn.execute(
            "INSERT INTO run_summaries \
             (run_id, run_timestamp, total_drivers, total_stops, delayed_stops, risk_level, summary_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT(run_id) DO UPDATE SET \
                 run_timestamp = excluded.run_timestamp, \
                 total_drivers = excluded.total_drivers, \
                 total_stops   = excluded.total_stops, \
                 delayed_stops = excluded.delayed_stops, \
                 risk_level    = excluded.risk_level, \
                 summary_json  = excluded.summary_json",
            params![
                self.run_id,
                summary.run_timestamp.to_rfc3339(),
                summary.metrics.total_drivers as i64,
                summary.metrics.total_stops as i64,
                summary.metrics.delayed_stops as i64,
                summary.risk_level,
                json,
            ],
        )?;
        Ok(())
    }

    /// Stored on the run's summary row; write the summary first.
    fn write_communications(&mut self, comms: &Communications) -> OutputResult<()> {
        let json = serde_json::to_string(comms)?;
        self.conn.execute(
            "UPDATE run_summaries SET communications_json = ?2 WHERE run_id = ?1",
            params![self.run_id, json],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
