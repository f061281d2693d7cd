//! Run configuration.
//!
//! Typically loaded from a TOML file by the application crate and passed,
//! read-only, to the projector, classifier, and communicator.
//!
//! # Sources (later wins)
//!
//! 1. Built-in defaults ([`EtaConfig::default`]).
//! 2. Optional configuration file (any format the `config` crate detects
//!    from the extension; TOML in this repository).
//! 3. Environment variables prefixed `ETA__`, with `__` separating nested
//!    keys: `ETA__DELAY_THRESHOLD_MIN=10`, `ETA__COMMS__BACKEND=live`.
//! 4. `OPENAI_API_KEY`, only when no API key was configured otherwise.
//!
//! Example file:
//!
//! ```toml
//! default_speed_kmh   = 45.0
//! service_time_min    = 5.0
//! delay_threshold_min = 15.0
//!
//! [driver_speeds]
//! driver_001 = 45.0
//!
//! [traffic]
//! policy = "uniform"
//! min    = 0.8
//! max    = 1.5
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{DriverId, EtaError, EtaResult};

/// Environment variable consulted for the API key when none is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ── Traffic ───────────────────────────────────────────────────────────────────

/// Which traffic multiplier distribution the projector samples from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficPolicyKind {
    /// Uniform over `[min, max]`, one draw per leg.
    #[default]
    Uniform,
    /// Heavy / moderate / normal tiers; simulates a congested day.
    Tiered,
    /// Always `fixed`; deterministic scenarios.
    Fixed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficSettings {
    pub policy: TrafficPolicyKind,
    /// Lower bound of the uniform multiplier range.
    pub min: f64,
    /// Upper bound of the uniform multiplier range.
    pub max: f64,
    /// Multiplier used by the `fixed` policy.
    pub fixed: f64,
}

impl Default for TrafficSettings {
    fn default() -> Self {
        Self {
            policy: TrafficPolicyKind::Uniform,
            min:    0.8,
            max:    1.5,
            fixed:  1.0,
        }
    }
}

// ── Severity ──────────────────────────────────────────────────────────────────

/// Delay bands for alert severity.  Both bounds are strict: a delay equal to
/// `high_above_min` is still MEDIUM.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityBands {
    pub medium_above_min: f64,
    pub high_above_min:   f64,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self {
            medium_above_min: 20.0,
            high_above_min:   30.0,
        }
    }
}

// ── Service time variation ────────────────────────────────────────────────────

/// Occasional extended dwell at a stop (delivery complications).
///
/// Disabled by default (`probability = 0`), which keeps service time at the
/// configured constant.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedServiceSettings {
    pub probability: f64,
    pub extra_min:   f64,
    pub extra_max:   f64,
}

impl Default for ExtendedServiceSettings {
    fn default() -> Self {
        Self {
            probability: 0.0,
            extra_min:   5.0,
            extra_max:   15.0,
        }
    }
}

// ── Communications ────────────────────────────────────────────────────────────

/// Which message generator the communicator uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommsBackend {
    /// Deterministic text built from the delay data.  No network.
    #[default]
    Template,
    /// Chat-completion HTTP service.
    Live,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommsSettings {
    pub backend:      CommsBackend,
    /// Base URL; `/chat/completions` is appended.
    pub endpoint:     String,
    pub model:        String,
    pub max_tokens:   u32,
    pub temperature:  f32,
    pub timeout_secs: u64,
    /// Never serialized, so run summaries can embed the settings safely.
    #[serde(skip_serializing)]
    pub api_key:      Option<String>,
}

impl Default for CommsSettings {
    fn default() -> Self {
        Self {
            backend:      CommsBackend::Template,
            endpoint:     "https://api.openai.com/v1".to_owned(),
            model:        "gpt-3.5-turbo".to_owned(),
            max_tokens:   500,
            temperature:  0.3,
            timeout_secs: 30,
            api_key:      None,
        }
    }
}

impl CommsSettings {
    /// The configured key, ignoring blank strings.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

// ── EtaConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for one projection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtaConfig {
    /// Average speed per driver, km/h.
    pub driver_speeds: BTreeMap<String, f64>,

    /// Speed used for drivers absent from `driver_speeds`.
    pub default_speed_kmh: f64,

    /// Dwell time at every stop, minutes.
    pub service_time_min: f64,

    pub traffic: TrafficSettings,

    /// A stop is delayed when its delay strictly exceeds this many minutes.
    pub delay_threshold_min: f64,

    pub severity: SeverityBands,

    pub extended_service: ExtendedServiceSettings,

    /// Master RNG seed.  The same seed always produces identical projections.
    pub seed: u64,

    /// How many of the worst delays go into summaries and messages.
    pub top_n: usize,

    pub comms: CommsSettings,
}

impl Default for EtaConfig {
    fn default() -> Self {
        let driver_speeds = [("driver_001", 45.0), ("driver_002", 40.0), ("driver_003", 50.0)]
            .into_iter()
            .map(|(id, kmh)| (id.to_owned(), kmh))
            .collect();

        Self {
            driver_speeds,
            default_speed_kmh:   45.0,
            service_time_min:    5.0,
            traffic:             TrafficSettings::default(),
            delay_threshold_min: 15.0,
            severity:            SeverityBands::default(),
            extended_service:    ExtendedServiceSettings::default(),
            seed:                42,
            top_n:               5,
            comms:               CommsSettings::default(),
        }
    }
}

impl EtaConfig {
    /// Load from an optional file plus `ETA__*` environment overrides, then
    /// validate.
    pub fn load(path: Option<&Path>) -> EtaResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(p) = path {
            debug!("loading configuration from {}", p.display());
            builder = builder.add_source(config::File::from(p));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("ETA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: EtaConfig = builder.build()?.try_deserialize()?;
        if cfg.comms.api_key().is_none() {
            cfg.comms.api_key = std::env::var(API_KEY_ENV).ok();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Average speed for `driver`, and whether the default was used.
    pub fn speed_for(&self, driver: &DriverId) -> (f64, bool) {
        match self.driver_speeds.get(driver.as_str()) {
            Some(&kmh) => (kmh, false),
            None => (self.default_speed_kmh, true),
        }
    }

    /// Reject settings the projector or classifier cannot interpret.
    ///
    /// Non-positive speeds are accepted: they are a defined degenerate case
    /// that yields zero travel time.  Non-finite speeds are not.
    pub fn validate(&self) -> EtaResult<()> {
        let t = &self.traffic;
        if !(t.min.is_finite() && t.max.is_finite() && t.fixed.is_finite()) {
            return Err(EtaError::Config("traffic multipliers must be finite".into()));
        }
        if t.min < 0.0 || t.fixed < 0.0 {
            return Err(EtaError::Config("traffic multipliers must be non-negative".into()));
        }
        if t.min > t.max {
            return Err(EtaError::Config(format!(
                "traffic range is inverted: min {} > max {}",
                t.min, t.max
            )));
        }
        if !self.service_time_min.is_finite() || self.service_time_min < 0.0 {
            return Err(EtaError::Config(format!(
                "service_time_min must be a non-negative number, got {}",
                self.service_time_min
            )));
        }
        if !self.delay_threshold_min.is_finite() {
            return Err(EtaError::Config("delay_threshold_min must be finite".into()));
        }
        if self.severity.medium_above_min > self.severity.high_above_min {
            return Err(EtaError::Config(format!(
                "severity bands are inverted: medium {} > high {}",
                self.severity.medium_above_min, self.severity.high_above_min
            )));
        }
        let x = &self.extended_service;
        if !(0.0..=1.0).contains(&x.probability) {
            return Err(EtaError::Config(format!(
                "extended_service.probability must be in [0, 1], got {}",
                x.probability
            )));
        }
        if x.extra_min < 0.0 || x.extra_min > x.extra_max {
            return Err(EtaError::Config(format!(
                "extended_service range is invalid: [{}, {}]",
                x.extra_min, x.extra_max
            )));
        }
        if !self.default_speed_kmh.is_finite() {
            return Err(EtaError::Config(format!(
                "default_speed_kmh must be finite, got {}",
                self.default_speed_kmh
            )));
        }
        if let Some((id, kmh)) = self.driver_speeds.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EtaError::Config(format!("speed for {id} must be finite, got {kmh}")));
        }
        if self.top_n == 0 {
            return Err(EtaError::Config("top_n must be at least 1".into()));
        }
        Ok(())
    }
}
