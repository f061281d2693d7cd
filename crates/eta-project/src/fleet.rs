//! Merged output of a fleet projection run.

use eta_core::DriverId;

use crate::{EtaProjection, ProjectError};

/// A driver that could not be projected, and why.
#[derive(Debug)]
pub struct DriverFailure {
    pub driver_id: DriverId,
    pub error:     ProjectError,
}

/// Everything [`Projector::project_fleet`][crate::Projector::project_fleet]
/// produced.
#[derive(Debug, Default)]
pub struct FleetProjection {
    /// All projections, ordered by driver id then sequence.
    pub projections: Vec<EtaProjection>,

    /// Drivers skipped because of bad input.
    pub failures: Vec<DriverFailure>,

    /// Drivers that projected successfully, including those with no stops.
    pub drivers_projected: usize,
}

impl FleetProjection {
    pub fn delayed(&self) -> impl Iterator<Item = &EtaProjection> {
        self.projections.iter().filter(|p| p.delayed)
    }

    pub fn delayed_count(&self) -> usize {
        self.delayed().count()
    }

    /// Projections for one driver, in sequence order.
    pub fn for_driver<'a>(&'a self, driver: &'a DriverId) -> impl Iterator<Item = &'a EtaProjection> {
        self.projections.iter().filter(move |p| &p.driver_id == driver)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }
}
