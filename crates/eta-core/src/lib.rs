//! `eta-core`: foundational types for the fleet ETA checker.
//!
//! This crate is a dependency of every other `eta-*` crate.  It has no
//! `eta-*` dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `DriverId`, `StopId`                                  |
//! | [`geo`]         | `GeoPoint`, great-circle distance in kilometres       |
//! | [`time`]        | `Timestamp`, minute arithmetic, timestamp parsing     |
//! | [`rng`]         | `DriverRng` (per-driver), `RunRng` (run-level)        |
//! | [`config`]      | `EtaConfig` and its sections, file/env loading        |
//! | [`error`]       | `EtaError`, `EtaResult`                               |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    CommsBackend, CommsSettings, EtaConfig, ExtendedServiceSettings, SeverityBands,
    TrafficPolicyKind, TrafficSettings,
};
pub use error::{EtaError, EtaResult};
pub use geo::GeoPoint;
pub use ids::{DriverId, StopId};
pub use rng::{DriverRng, RunRng};
pub use time::Timestamp;
