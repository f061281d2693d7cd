//! Projection observer trait for progress reporting and data collection.

use eta_core::DriverId;

use crate::{EtaProjection, FleetProjection, ProjectError};

/// Callbacks invoked by [`Projector::project_fleet`][crate::Projector::project_fleet].
///
/// Hooks fire on the calling thread in ascending driver order, after any
/// parallel work has finished, so implementations need no synchronisation.
/// All methods have default no-op implementations.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl ProjectionObserver for Progress {
///     fn on_driver_projected(&mut self, driver: &DriverId, rows: &[EtaProjection]) {
///         println!("{driver}: {} stops", rows.len());
///     }
/// }
/// ```
pub trait ProjectionObserver {
    /// Called once before any driver is reported.
    fn on_run_start(&mut self, _drivers: usize) {}

    /// Called with one driver's projections, in sequence order.
    fn on_driver_projected(&mut self, _driver: &DriverId, _projections: &[EtaProjection]) {}

    /// Called when a driver could not be projected.  The run continues.
    fn on_driver_failed(&mut self, _driver: &DriverId, _error: &ProjectError) {}

    /// Called once with the merged result.
    fn on_run_end(&mut self, _fleet: &FleetProjection) {}
}

/// A [`ProjectionObserver`] that does nothing.
pub struct NoopObserver;

impl ProjectionObserver for NoopObserver {}
