//! Validated per-driver routes and fleet grouping.

use std::collections::{BTreeMap, HashMap, HashSet};

use eta_core::DriverId;
use log::{debug, warn};

use crate::{DriverPosition, RouteError, RouteResult, Stop};

// ── Route ─────────────────────────────────────────────────────────────────────

/// One driver's remaining stops in traversal order.
///
/// Construct via [`Route::new`], which enforces the ordering rules, so a
/// `Route` value is always safe to project.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    driver: DriverId,
    stops:  Vec<Stop>,
}

impl Route {
    /// Validate `stops` for `driver` and sort them by sequence.
    ///
    /// Fails on a stop filed under another driver, a zero sequence, a
    /// repeated sequence, or a repeated stop id.  Gaps in the sequence
    /// (`1, 2, 5`) are accepted.
    pub fn new(driver: DriverId, mut stops: Vec<Stop>) -> RouteResult<Self> {
        let mut seen_ids = HashSet::with_capacity(stops.len());
        for stop in &stops {
            if stop.driver_id != driver {
                return Err(RouteError::ForeignStop {
                    expected: driver,
                    found:    stop.driver_id.clone(),
                    stop:     stop.stop_id.clone(),
                });
            }
            if stop.sequence == 0 {
                return Err(RouteError::InvalidSequence {
                    driver,
                    stop: stop.stop_id.clone(),
                });
            }
            if !seen_ids.insert(&stop.stop_id) {
                return Err(RouteError::DuplicateStop {
                    driver,
                    stop: stop.stop_id.clone(),
                });
            }
        }

        // Stable sort: equal sequences keep input order so the error below
        // names them in the order they were supplied.
        stops.sort_by_key(|s| s.sequence);
        if let Some(pair) = stops.windows(2).find(|w| w[0].sequence == w[1].sequence) {
            return Err(RouteError::DuplicateSequence {
                driver,
                sequence: pair[0].sequence,
                first:    pair[0].stop_id.clone(),
                second:   pair[1].stop_id.clone(),
            });
        }

        let route = Self { driver, stops };
        if !route.is_contiguous() {
            debug!("route for {} has sequence gaps", route.driver);
        }
        Ok(route)
    }

    /// A route with no remaining stops.
    pub fn empty(driver: DriverId) -> Self {
        Self { driver, stops: Vec::new() }
    }

    #[inline]
    pub fn driver(&self) -> &DriverId {
        &self.driver
    }

    /// Stops in ascending sequence order.
    #[inline]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// `true` if sequences run `k, k+1, k+2, …` with no gaps.
    pub fn is_contiguous(&self) -> bool {
        self.stops.windows(2).all(|w| w[1].sequence == w[0].sequence + 1)
    }
}

// ── Fleet grouping ────────────────────────────────────────────────────────────

/// Split a flat stop list into one route per driver.
///
/// Every driver that owns at least one stop gets an entry; drivers whose
/// stops break the ordering rules get an `Err` instead of a route.
pub fn group_routes<I>(stops: I) -> BTreeMap<DriverId, RouteResult<Route>>
where
    I: IntoIterator<Item = Stop>,
{
    let mut by_driver: HashMap<DriverId, Vec<Stop>> = HashMap::new();
    for stop in stops {
        by_driver.entry(stop.driver_id.clone()).or_default().push(stop);
    }

    by_driver
        .into_iter()
        .map(|(driver, stops)| {
            let route = Route::new(driver.clone(), stops);
            (driver, route)
        })
        .collect()
}

/// Keep one observation per driver: the most recent.
///
/// Older duplicates are dropped with a warning; ties keep the first seen.
pub fn latest_positions<I>(positions: I) -> BTreeMap<DriverId, DriverPosition>
where
    I: IntoIterator<Item = DriverPosition>,
{
    let mut latest: BTreeMap<DriverId, DriverPosition> = BTreeMap::new();
    for pos in positions {
        match latest.get_mut(&pos.driver_id) {
            None => {
                latest.insert(pos.driver_id.clone(), pos);
            }
            Some(current) => {
                warn!(
                    "driver {} has more than one position; keeping the latest",
                    pos.driver_id
                );
                if pos.observed_at > current.observed_at {
                    *current = pos;
                }
            }
        }
    }
    latest
}
