//! `eta-route`: delivery stops, driver positions, and per-driver routes.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`stop`]      | `Stop`, `DriverPosition`                                  |
//! | [`route`]     | `Route` (validated, sequence-ordered), `group_routes`, `latest_positions` |
//! | [`loader`]    | `load_stops_csv`, `load_positions_csv` and reader variants |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                            |
//!
//! # Ordering model (summary)
//!
//! Stops sharing a driver id form that driver's candidate route.  Traversal
//! order is the `sequence` field and nothing else:
//!
//! ```text
//! sequence must be ≥ 1 and unique per driver
//! stop_id  must be unique per driver
//! traversal = stops sorted by sequence ascending
//! ```
//!
//! A route that breaks these rules is rejected as a whole; the rest of the
//! fleet is unaffected.

pub mod error;
pub mod loader;
pub mod route;
pub mod stop;


pub use error::{RouteError, RouteResult};
pub use loader::{load_positions_csv, load_positions_reader, load_stops_csv, load_stops_reader};
pub use route::{Route, group_routes, latest_positions};
pub use stop::{DriverPosition, Stop};
