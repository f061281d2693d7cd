//! Fleet-level aggregates built from projections and alerts.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use eta_core::{DriverId, StopId, Timestamp};
use eta_project::EtaProjection;

use crate::{Alert, Severity};

// ── FleetMetrics ──────────────────────────────────────────────────────────────

/// Counts and averages over every projected stop.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FleetMetrics {
    pub total_drivers:      usize,
    pub total_stops:        usize,
    pub delayed_stops:      usize,
    /// `delayed_stops / total_stops × 100`; 0 with no stops.
    pub delay_rate_percent: f64,
    /// Mean signed delay over all stops, early ones included.
    pub average_delay_min:  f64,
    pub max_delay_min:      f64,
    pub total_distance_km:  f64,
    pub average_speed_kmh:  f64,
}

impl FleetMetrics {
    pub fn from_projections(projections: &[EtaProjection]) -> Self {
        if projections.is_empty() {
            return Self::default();
        }
        let n = projections.len() as f64;
        let drivers: BTreeSet<&DriverId> = projections.iter().map(|p| &p.driver_id).collect();
        let delayed = projections.iter().filter(|p| p.delayed).count();

        Self {
            total_drivers:      drivers.len(),
            total_stops:        projections.len(),
            delayed_stops:      delayed,
            delay_rate_percent: delayed as f64 / n * 100.0,
            average_delay_min:  projections.iter().map(|p| p.delay_min).sum::<f64>() / n,
            max_delay_min:      projections
                .iter()
                .map(|p| p.delay_min)
                .fold(f64::NEG_INFINITY, f64::max),
            total_distance_km:  projections.iter().map(|p| p.distance_km).sum(),
            average_speed_kmh:  projections.iter().map(|p| p.avg_speed_kmh).sum::<f64>() / n,
        }
    }

    #[inline]
    pub fn on_time_rate_percent(&self) -> f64 {
        100.0 - self.delay_rate_percent
    }
}

// ── Severity counts and risk ──────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub high:   usize,
    pub medium: usize,
    pub low:    usize,
}

impl SeverityCounts {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut counts = Self::default();
        for alert in alerts {
            match alert.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Overall operational risk for a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// HIGH with any high-severity alert, MEDIUM with any alert, else LOW.
    pub fn assess(counts: &SeverityCounts) -> Self {
        if counts.high > 0 {
            RiskLevel::High
        } else if counts.total() > 0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Case-insensitive parse of `LOW` / `MEDIUM` / `HIGH`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DelaySummary ──────────────────────────────────────────────────────────────

/// One row of the worst-delays list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopDelay {
    pub driver_id:         DriverId,
    pub stop_id:           StopId,
    pub sequence:          u32,
    pub customer:          String,
    pub delay_min:         f64,
    pub severity:          Severity,
    pub planned_arrival:   Timestamp,
    pub projected_arrival: Timestamp,
}

impl From<&Alert> for TopDelay {
    fn from(alert: &Alert) -> Self {
        let p = &alert.projection;
        Self {
            driver_id:         p.driver_id.clone(),
            stop_id:           p.stop_id.clone(),
            sequence:          p.sequence,
            customer:          p.customer.clone(),
            delay_min:         p.delay_min,
            severity:          alert.severity,
            planned_arrival:   p.planned_arrival,
            projected_arrival: p.projected_arrival,
        }
    }
}

/// Aggregate handed to message generators and exporters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DelaySummary {
    pub metrics:             FleetMetrics,
    pub severity:            SeverityCounts,
    pub delay_threshold_min: f64,
    /// At most `top_n` worst delays, worst first.
    pub top_delays:          Vec<TopDelay>,
}

impl DelaySummary {
    /// `alerts` must come from [`classify`][crate::classify] so the top-N
    /// slice is the worst delays.
    pub fn build(
        projections:         &[EtaProjection],
        alerts:              &[Alert],
        delay_threshold_min: f64,
        top_n:               usize,
    ) -> Self {
        Self {
            metrics:    FleetMetrics::from_projections(projections),
            severity:   SeverityCounts::from_alerts(alerts),
            delay_threshold_min,
            top_delays: alerts.iter().take(top_n).map(TopDelay::from).collect(),
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::assess(&self.severity)
    }

    #[inline]
    pub fn has_delays(&self) -> bool {
        self.severity.total() > 0
    }
}
