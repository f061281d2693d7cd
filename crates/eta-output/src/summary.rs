//! The per-run summary document.

use std::collections::BTreeMap;

use serde::Serialize;

use eta_alert::{DelaySummary, FleetMetrics, SeverityCounts};
use eta_comms::Communications;
use eta_core::{EtaConfig, Timestamp, TrafficSettings};
use eta_project::DriverFailure;

/// The configuration values that shaped a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSnapshot {
    pub delay_threshold_min: f64,
    pub service_time_min:    f64,
    pub traffic:             TrafficSettings,
    pub driver_speeds:       BTreeMap<String, f64>,
    pub default_speed_kmh:   f64,
    pub seed:                u64,
}

impl From<&EtaConfig> for ConfigSnapshot {
    fn from(c: &EtaConfig) -> Self {
        Self {
            delay_threshold_min: c.delay_threshold_min,
            service_time_min:    c.service_time_min,
            traffic:             c.traffic.clone(),
            driver_speeds:       c.driver_speeds.clone(),
            default_speed_kmh:   c.default_speed_kmh,
            seed:                c.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommsSummary {
    pub generator:                   String,
    pub supervisor_risk_level:       String,
    pub dispatcher_alert_generated:  bool,
    pub customer_messages_generated: usize,
    pub fallbacks:                   usize,
}

impl From<&Communications> for CommsSummary {
    fn from(c: &Communications) -> Self {
        Self {
            generator:                   c.generator.to_owned(),
            supervisor_risk_level:       c.supervisor_report.risk_level.clone(),
            dispatcher_alert_generated:  !c.dispatcher_alert.is_empty(),
            customer_messages_generated: c.customer_messages.len(),
            fallbacks:                   c.fallbacks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDriver {
    pub driver_id: String,
    pub reason:    String,
}

impl From<&DriverFailure> for FailedDriver {
    fn from(f: &DriverFailure) -> Self {
        Self { driver_id: f.driver_id.to_string(), reason: f.error.to_string() }
    }
}

/// Everything worth keeping about one run, minus the per-stop rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_timestamp:  Timestamp,
    pub configuration:  ConfigSnapshot,
    pub metrics:        FleetMetrics,
    pub alerts:         SeverityCounts,
    pub risk_level:     String,
    /// `None` when messages were not generated.
    pub communications: Option<CommsSummary>,
    pub failed_drivers: Vec<FailedDriver>,
}

impl RunSummary {
    pub fn new(
        run_timestamp: Timestamp,
        config:        &EtaConfig,
        summary:       &DelaySummary,
        comms:         Option<&Communications>,
        failures:      &[DriverFailure],
    ) -> Self {
        Self {
            run_timestamp,
            configuration:  ConfigSnapshot::from(config),
            metrics:        summary.metrics.clone(),
            alerts:         summary.severity,
            risk_level:     summary.risk_level().to_string(),
            communications: comms.map(CommsSummary::from),
            failed_drivers: failures.iter().map(FailedDriver::from).collect(),
        }
    }
}
