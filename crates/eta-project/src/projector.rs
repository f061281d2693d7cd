//! The `Projector` and its per-driver leg loop.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use eta_core::time::{add_minutes, minutes_between};
use eta_core::{DriverId, DriverRng, EtaConfig};
use eta_route::{DriverPosition, Route, RouteResult, Stop, group_routes, latest_positions};
use eta_traffic::{ServiceModel, TrafficModel};

use crate::{
    DriverFailure, EtaProjection, FleetProjection, ProjectError, ProjectResult,
    ProjectionObserver, travel_time_minutes,
};

// ── Work items assembled before the projection phase ──────────────────────────

/// One driver's input, resolved sequentially so the (potentially parallel)
/// projection phase only reads immutable data.
enum Job<'a> {
    Project(&'a DriverPosition, Route),
    Fail(ProjectError),
}

// ── Projector ─────────────────────────────────────────────────────────────────

/// Projects arrival times for driver routes.
///
/// `Projector<T, S>` is read-only once built: every call derives a fresh
/// [`DriverRng`] from `config.seed` and the driver id, so repeated calls with
/// the same inputs give identical projections and drivers never influence
/// each other.
///
/// Create via [`ProjectorBuilder`][crate::ProjectorBuilder].
pub struct Projector<T: TrafficModel, S: ServiceModel> {
    /// Validated run configuration (speeds, threshold, seed, …).
    pub config: EtaConfig,

    /// Sampled once per leg.
    pub traffic: T,

    /// Sampled once per stop, after that stop's traffic draw.
    pub service: S,
}

impl<T: TrafficModel, S: ServiceModel> Projector<T, S> {
    // ── Single driver ─────────────────────────────────────────────────────

    /// Project `route` from `position` with the driver's seeded RNG.
    pub fn project_driver(
        &self,
        position: &DriverPosition,
        route:    &Route,
    ) -> ProjectResult<Vec<EtaProjection>> {
        let mut rng = DriverRng::new(self.config.seed, route.driver());
        self.project_route(position, route, &mut rng)
    }

    /// Project `route` from `position`, drawing traffic and dwell from `rng`.
    ///
    /// Emits one [`EtaProjection`] per stop in ascending sequence order.  An
    /// empty route yields an empty vector.  Fails only if `position` belongs
    /// to a different driver than `route`.
    pub fn project_route(
        &self,
        position: &DriverPosition,
        route:    &Route,
        rng:      &mut DriverRng,
    ) -> ProjectResult<Vec<EtaProjection>> {
        let driver = route.driver();
        if position.driver_id != *driver {
            return Err(ProjectError::DriverMismatch {
                position: position.driver_id.clone(),
                route:    driver.clone(),
            });
        }

        let (speed_kmh, fallback) = self.config.speed_for(driver);
        if fallback && !route.is_empty() {
            warn!("no configured speed for {driver}; using default {speed_kmh} km/h");
        }
        if speed_kmh <= 0.0 && !route.is_empty() {
            warn!("{driver} has non-positive speed {speed_kmh} km/h; travel times are zero");
        }

        let threshold = self.config.delay_threshold_min;
        let origin    = position.observed_at;

        // Minutes since `origin` are carried as f64 and converted to a
        // timestamp once per stop, so sub-second legs never round away.
        let mut cursor  = position.location;
        let mut elapsed = 0.0_f64;
        let mut out     = Vec::with_capacity(route.len());

        for stop in route.stops() {
            let distance_km     = cursor.distance_km(stop.location);
            let traffic         = self.traffic.sample(rng);
            let travel_time_min = travel_time_minutes(distance_km, speed_kmh, traffic);
            let arrival         = elapsed + travel_time_min;
            let delay_min       = minutes_between(origin, stop.planned_arrival) + arrival;
            let service_time_min = self.service.dwell_minutes(rng);

            out.push(EtaProjection {
                driver_id:          stop.driver_id.clone(),
                stop_id:            stop.stop_id.clone(),
                sequence:           stop.sequence,
                customer:           stop.customer.clone(),
                location:           stop.location,
                distance_km,
                travel_time_min,
                service_time_min,
                traffic_multiplier: traffic,
                planned_arrival:    stop.planned_arrival,
                projected_arrival:  add_minutes(origin, arrival),
                delay_min,
                delayed:            delay_min > threshold,
                avg_speed_kmh:      speed_kmh,
            });

            cursor  = stop.location;
            elapsed = arrival + service_time_min;
        }

        debug!(
            "projected {} stops for {driver}: {:.1} min to last departure",
            out.len(),
            elapsed
        );
        Ok(out)
    }

    // ── Fleet ─────────────────────────────────────────────────────────────

    /// Group raw inputs and project the whole fleet.
    ///
    /// Positions are reduced to the latest per driver and stops are grouped
    /// into validated routes, then [`project_fleet`][Self::project_fleet]
    /// does the rest.
    pub fn project_all<O: ProjectionObserver>(
        &self,
        positions: Vec<DriverPosition>,
        stops:     Vec<Stop>,
        observer:  &mut O,
    ) -> FleetProjection {
        let positions = latest_positions(positions);
        let routes    = group_routes(stops);
        self.project_fleet(&positions, routes, observer)
    }

    /// Project every driver that has a position or a route.
    ///
    /// - A driver with a position but no stops produces no projections.
    /// - A driver with stops but no position is recorded as a failure.
    /// - A driver whose stops failed validation is recorded as a failure.
    ///
    /// Failures never abort the run.  The merged projections are ordered by
    /// driver id, then sequence.  With the `parallel` Cargo feature drivers
    /// are projected on Rayon's thread pool; the result is identical.
    pub fn project_fleet<O: ProjectionObserver>(
        &self,
        positions: &BTreeMap<DriverId, DriverPosition>,
        mut routes: BTreeMap<DriverId, RouteResult<Route>>,
        observer:  &mut O,
    ) -> FleetProjection {
        // ── Phase 1: resolve inputs (sequential) ──────────────────────────
        let mut jobs: Vec<(DriverId, Job<'_>)> = Vec::with_capacity(positions.len() + routes.len());
        for (driver, position) in positions {
            let job = match routes.remove(driver) {
                Some(Ok(route)) => Job::Project(position, route),
                Some(Err(e)) => Job::Fail(e.into()),
                None => Job::Project(position, Route::empty(driver.clone())),
            };
            jobs.push((driver.clone(), job));
        }
        for (driver, route) in routes {
            let error = match route {
                Ok(_) => ProjectError::MissingPosition(driver.clone()),
                Err(e) => e.into(),
            };
            jobs.push((driver, Job::Fail(error)));
        }
        jobs.sort_by(|a, b| a.0.cmp(&b.0));

        observer.on_run_start(jobs.len());

        // ── Phase 2: project (optionally parallel) ────────────────────────
        let results = self.run_jobs(jobs);

        // ── Phase 3: merge (sequential, ascending DriverId) ───────────────
        let mut fleet = FleetProjection::default();
        for (driver, result) in results {
            match result {
                Ok(rows) => {
                    observer.on_driver_projected(&driver, &rows);
                    fleet.drivers_projected += 1;
                    fleet.projections.extend(rows);
                }
                Err(error) => {
                    warn!("skipping {driver}: {error}");
                    observer.on_driver_failed(&driver, &error);
                    fleet.failures.push(DriverFailure { driver_id: driver, error });
                }
            }
        }

        info!(
            "projected {} stops for {} drivers ({} failed, {} delayed)",
            fleet.projections.len(),
            fleet.drivers_projected,
            fleet.failures.len(),
            fleet.delayed_count()
        );
        observer.on_run_end(&fleet);
        fleet
    }

    fn run_jobs(
        &self,
        jobs: Vec<(DriverId, Job<'_>)>,
    ) -> Vec<(DriverId, ProjectResult<Vec<EtaProjection>>)> {
        let run = |(driver, job): (DriverId, Job<'_>)| {
            let result = match job {
                Job::Project(position, route) => self.project_driver(position, &route),
                Job::Fail(e) => Err(e),
            };
            (driver, result)
        };

        #[cfg(not(feature = "parallel"))]
        {
            jobs.into_iter().map(run).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // `collect` on an indexed parallel iterator preserves input order.
            jobs.into_par_iter().map(run).collect()
        }
    }
}
