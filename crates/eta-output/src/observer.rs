//! `ExportObserver<W>`: bridges `ProjectionObserver` to an `OutputWriter`.

use eta_core::DriverId;
use eta_project::{EtaProjection, FleetProjection, ProjectionObserver};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`ProjectionObserver`] that streams each driver's projections to any
/// [`OutputWriter`] backend as soon as the driver is done.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run, check for errors with
/// [`take_error`][Self::take_error].  The writer is not finished by the
/// observer: alerts, summary, and communications still go through
/// [`writer_mut`][Self::writer_mut].
pub struct ExportObserver<W: OutputWriter> {
    writer:     W,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ExportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Projections handed to the writer so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ProjectionObserver for ExportObserver<W> {
    fn on_driver_projected(&mut self, _driver: &DriverId, projections: &[EtaProjection]) {
        if projections.is_empty() {
            return;
        }
        let result = self.writer.write_projections(projections);
        if result.is_ok() {
            self.rows += projections.len();
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, _fleet: &FleetProjection) {
        log::debug!("export observer wrote {} projections", self.rows);
    }
}
