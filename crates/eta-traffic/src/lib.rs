//! `eta-traffic`: per-leg traffic and per-stop dwell strategies.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`traffic`] | `TrafficModel` trait; `FixedTraffic`, `UniformTraffic`, `TieredTraffic`, `TrafficPolicy` |
//! | [`service`] | `ServiceModel` trait; `FixedService`, `ExtendedService`, `ServicePolicy` |
//! | [`error`]   | `TrafficError`, `TrafficResult<T>`                              |
//!
//! # Design notes
//!
//! The projector asks each strategy for one value per leg (traffic) or per
//! stop (dwell), always passing the driver's own [`DriverRng`].  Strategies
//! hold only immutable parameters, so one instance is shared by every
//! worker thread; all randomness lives in the RNG that is handed in.
//!
//! [`DriverRng`]: eta_core::DriverRng

pub mod error;
pub mod service;
pub mod traffic;


pub use error::{TrafficError, TrafficResult};
pub use service::{ExtendedService, FixedService, ServiceModel, ServicePolicy};
pub use traffic::{FixedTraffic, Tier, TieredTraffic, TrafficModel, TrafficPolicy, UniformTraffic};
