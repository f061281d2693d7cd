//! Fluent builder for constructing a [`Projector`].

use eta_core::{DriverId, EtaConfig};
use eta_traffic::{ServiceModel, ServicePolicy, TrafficModel, TrafficPolicy};

use crate::{Projector, ProjectResult};

/// Fluent builder for [`Projector<T, S>`].
///
/// # Required inputs
///
/// - [`EtaConfig`]: speeds, service time, threshold, seed, …
/// - `T: TrafficModel`: the per-leg multiplier distribution
/// - `S: ServiceModel`: the per-stop dwell distribution
///
/// [`from_config`][ProjectorBuilder::from_config] derives both models from
/// the configuration instead.
///
/// # Optional overrides
///
/// | Method               | Default                        |
/// |----------------------|--------------------------------|
/// | `.seed(s)`           | `config.seed`                  |
/// | `.threshold(min)`    | `config.delay_threshold_min`   |
/// | `.driver_speed(d,v)` | `config.driver_speeds`         |
///
/// # Example
///
/// ```rust,ignore
/// let projector = ProjectorBuilder::new(config, FixedTraffic(1.0), FixedService(5.0))
///     .seed(7)
///     .build()?;
/// ```
pub struct ProjectorBuilder<T: TrafficModel, S: ServiceModel> {
    config:  EtaConfig,
    traffic: T,
    service: S,
}

impl ProjectorBuilder<TrafficPolicy, ServicePolicy> {
    /// Builder whose traffic and service models come from `config`.
    pub fn from_config(config: EtaConfig) -> ProjectResult<Self> {
        let traffic = TrafficPolicy::from_settings(&config.traffic)?;
        let service = ServicePolicy::from_config(&config)?;
        Ok(Self::new(config, traffic, service))
    }
}

impl<T: TrafficModel, S: ServiceModel> ProjectorBuilder<T, S> {
    /// Create a builder with all required inputs.
    pub fn new(config: EtaConfig, traffic: T, service: S) -> Self {
        Self { config, traffic, service }
    }

    /// Override the master seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Override the delay threshold, minutes.
    pub fn threshold(mut self, minutes: f64) -> Self {
        self.config.delay_threshold_min = minutes;
        self
    }

    /// Set or replace one driver's average speed, km/h.
    pub fn driver_speed(mut self, driver: &DriverId, kmh: f64) -> Self {
        self.config.driver_speeds.insert(driver.as_str().to_owned(), kmh);
        self
    }

    /// Validate the configuration and return a ready-to-use [`Projector`].
    pub fn build(self) -> ProjectResult<Projector<T, S>> {
        self.config.validate()?;
        Ok(Projector {
            config:  self.config,
            traffic: self.traffic,
            service: self.service,
        })
    }
}
