//! `eta-alert`: turns projections into ranked delay alerts.
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`severity`] | `Severity`, `Alert`, `classify`                       |
//! | [`summary`]  | `FleetMetrics`, `SeverityCounts`, `DelaySummary`, `RiskLevel` |
//!
//! Alerts come out worst-first.  Everything that reports "the top N delays"
//! (summaries, dispatcher messages, exports) relies on that order.

pub mod severity;
pub mod summary;

#[cfg(test)]
mod tests;

pub use severity::{Alert, Severity, classify};
pub use summary::{DelaySummary, FleetMetrics, RiskLevel, SeverityCounts, TopDelay};
