//! `eta-output`: export writers for projection runs.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                   |
//! |-----------|---------|-----------------------------------------------------------------|
//! | *(none)*  | CSV     | `eta_results.csv`, `delivery_alerts.csv`, `eta_summary.json`, `llm_communications.json` |
//! | `sqlite`  | SQLite  | `eta.db` (`eta_projections`, `delivery_alerts`, `run_summaries`) |
//!
//! CSV file names take an optional `_<stamp>` suffix so repeated runs in one
//! directory do not overwrite each other.
//!
//! All backends implement [`OutputWriter`].  Projections can be streamed
//! while the fleet is projected with [`ExportObserver`], which implements
//! `eta_project::ProjectionObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use eta_output::{CsvWriter, ExportObserver, OutputWriter};
//!
//! let writer = CsvWriter::new(Path::new("./output"), Some(&stamp))?;
//! let mut obs = ExportObserver::new(writer);
//! let fleet = projector.project_all(positions, stops, &mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod summary;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use self::csv::{CsvWriter, OutputPaths};
pub use error::{OutputError, OutputResult};
pub use observer::ExportObserver;
pub use row::{AlertRow, ProjectionRow};
pub use summary::{CommsSummary, ConfigSnapshot, FailedDriver, RunSummary};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
