//! Severity bands and the delay classifier.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use eta_core::{SeverityBands, Timestamp};
use eta_project::EtaProjection;

/// How late a delayed stop is.
///
/// Ordered `Low < Medium < High`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Band for a delay in minutes.  Both bounds are strict greater-than.
    pub fn from_delay(delay_min: f64, bands: &SeverityBands) -> Self {
        if delay_min > bands.high_above_min {
            Severity::High
        } else if delay_min > bands.medium_above_min {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delayed stop with its severity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alert {
    pub projection: EtaProjection,
    pub severity:   Severity,
    /// When the classifier ran.
    pub raised_at:  Timestamp,
}

impl Alert {
    #[inline]
    pub fn delay_min(&self) -> f64 {
        self.projection.delay_min
    }
}

/// Alerts for every delayed projection, worst delay first.
///
/// Only records with `delayed == true` are kept.  Equal delays keep their
/// input order.  No delays yields an empty vector.
pub fn classify(
    projections: &[EtaProjection],
    bands:       &SeverityBands,
    raised_at:   Timestamp,
) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = projections
        .iter()
        .filter(|p| p.delayed)
        .map(|p| Alert {
            projection: p.clone(),
            severity:   Severity::from_delay(p.delay_min, bands),
            raised_at,
        })
        .collect();

    alerts.sort_by(|a, b| b.delay_min().total_cmp(&a.delay_min()));
    debug!("{} of {} projections raised alerts", alerts.len(), projections.len());
    alerts
}
