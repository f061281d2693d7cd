//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `eta_results.csv`
//! - `delivery_alerts.csv` (header always written, even with no alerts)
//! - `eta_summary.json`
//! - `llm_communications.json`

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::debug;
use serde::Serialize;

use eta_alert::Alert;
use eta_comms::Communications;
use eta_project::EtaProjection;

use crate::writer::OutputWriter;
use crate::{AlertRow, OutputResult, ProjectionRow, RunSummary};

/// Where a [`CsvWriter`] puts each file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub projections:    PathBuf,
    pub alerts:         PathBuf,
    pub summary:        PathBuf,
    pub communications: PathBuf,
}

impl OutputPaths {
    /// `stem.ext` or `stem_<stamp>.ext` in `dir`.
    pub fn new(dir: &Path, stamp: Option<&str>) -> Self {
        let name = |stem: &str, ext: &str| match stamp {
            Some(s) => dir.join(format!("{stem}_{s}.{ext}")),
            None => dir.join(format!("{stem}.{ext}")),
        };
        Self {
            projections:    name("eta_results", "csv"),
            alerts:         name("delivery_alerts", "csv"),
            summary:        name("eta_summary", "json"),
            communications: name("llm_communications", "json"),
        }
    }
}

/// Writes run output to two CSV files and two JSON documents.
pub struct CsvWriter {
    paths:       OutputPaths,
    projections: Writer<File>,
    alerts:      Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files, and write their
    /// header rows.
    pub fn new(dir: &Path, stamp: Option<&str>) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        let paths = OutputPaths::new(dir, stamp);

        let mut projections = Writer::from_path(&paths.projections)?;
        projections.write_record(ProjectionRow::HEADER)?;

        let mut alerts = Writer::from_path(&paths.alerts)?;
        alerts.write_record(AlertRow::header())?;

        debug!("writing CSV output to {}", dir.display());
        Ok(Self {
            paths,
            projections,
            alerts,
            finished: false,
        })
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> OutputResult<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

impl OutputWriter for CsvWriter {
    fn write_projections(&mut self, rows: &[EtaProjection]) -> OutputResult<()> {
        for row in rows {
            self.projections.write_record(ProjectionRow::from(row).record())?;
        }
        Ok(())
    }

    fn write_alerts(&mut self, alerts: &[Alert]) -> OutputResult<()> {
        for alert in alerts {
            self.alerts.write_record(AlertRow::from(alert).record())?;
        }
        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()> {
        write_json(&self.paths.summary, summary)
    }

    fn write_communications(&mut self, comms: &Communications) -> OutputResult<()> {
        write_json(&self.paths.communications, comms)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.projections.flush()?;
        self.alerts.flush()?;
        Ok(())
    }
}
