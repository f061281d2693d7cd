//! The `OutputWriter` trait implemented by all backend writers.

use eta_alert::Alert;
use eta_comms::Communications;
use eta_project::EtaProjection;

use crate::{OutputResult, RunSummary};

/// Trait implemented by the CSV and SQLite writers.
///
/// Projections may arrive in several batches (one per driver when driven by
/// [`ExportObserver`][crate::ExportObserver]).  Alerts, the summary, and the
/// communications are written once per run.
pub trait OutputWriter {
    /// Append a batch of projections.
    fn write_projections(&mut self, rows: &[EtaProjection]) -> OutputResult<()>;

    /// Write the run's alerts, worst first.  An empty slice is valid.
    fn write_alerts(&mut self, alerts: &[Alert]) -> OutputResult<()>;

    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()>;

    fn write_communications(&mut self, comms: &Communications) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
