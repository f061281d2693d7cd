//! `eta-project`: arrival-time projection for a fleet of drivers.
//!
//! # Per-driver loop
//!
//! ```text
//! cursor = driver position, elapsed = 0
//! for stop in route (ascending sequence):
//!   ① distance  = great-circle(cursor, stop)
//!   ② traffic   = TrafficModel::sample            (one draw per leg)
//!   ③ travel    = distance / speed × traffic × 60  (0 if speed ≤ 0)
//!   ④ arrival   = observed_at + elapsed + travel
//!   ⑤ delay     = arrival − planned                (signed minutes)
//!   ⑥ dwell     = ServiceModel::dwell_minutes
//!   ⑦ emit EtaProjection
//!   ⑧ cursor = stop, elapsed = elapsed + travel + dwell
//! ```
//!
//! Only the first leg starts from the live position; every later arrival is
//! chained from the previous stop's projected departure, so lateness at one
//! stop carries into all the stops after it.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Projects drivers on Rayon's thread pool.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use eta_project::{NoopObserver, ProjectorBuilder};
//!
//! let projector = ProjectorBuilder::from_config(config)?.build()?;
//! let fleet = projector.project_all(positions, stops, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod projection;
pub mod projector;


pub use builder::ProjectorBuilder;
pub use error::{ProjectError, ProjectResult};
pub use fleet::{DriverFailure, FleetProjection};
pub use observer::{NoopObserver, ProjectionObserver};
pub use projection::{EtaProjection, travel_time_minutes};
pub use projector::Projector;
