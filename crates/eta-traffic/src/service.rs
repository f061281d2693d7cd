//! The `ServiceModel` trait: dwell time spent at each stop.

use eta_core::{DriverRng, EtaConfig};

use crate::{TrafficError, TrafficResult};

/// Pluggable per-stop dwell.
///
/// Called once per stop after its arrival is projected.  The result is the
/// time the driver spends there before leaving for the next leg, so it
/// pushes every later arrival back.  Dwell is incurred whether or not the
/// stop is late.
pub trait ServiceModel: Send + Sync {
    fn dwell_minutes(&self, rng: &mut DriverRng) -> f64;
}

impl<T: ServiceModel + ?Sized> ServiceModel for Box<T> {
    fn dwell_minutes(&self, rng: &mut DriverRng) -> f64 {
        (**self).dwell_minutes(rng)
    }
}

/// The configured constant at every stop.  Draws nothing from the RNG.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedService(pub f64);

impl ServiceModel for FixedService {
    #[inline]
    fn dwell_minutes(&self, _rng: &mut DriverRng) -> f64 {
        self.0
    }
}

/// The configured constant, plus an occasional complication.
///
/// With probability `probability` a uniform extra in `[extra_min, extra_max]`
/// is added to `base`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExtendedService {
    base:        f64,
    probability: f64,
    extra_min:   f64,
    extra_max:   f64,
}

impl ExtendedService {
    pub fn new(base: f64, probability: f64, extra_min: f64, extra_max: f64) -> TrafficResult<Self> {
        if !base.is_finite() || base < 0.0 {
            return Err(TrafficError::InvalidServiceTime(base));
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(TrafficError::InvalidProbability(probability));
        }
        if !(extra_min.is_finite() && extra_max.is_finite()) || extra_min < 0.0 || extra_min > extra_max {
            return Err(TrafficError::InvalidRange { min: extra_min, max: extra_max });
        }
        Ok(Self { base, probability, extra_min, extra_max })
    }
}

impl ServiceModel for ExtendedService {
    fn dwell_minutes(&self, rng: &mut DriverRng) -> f64 {
        if rng.gen_bool(self.probability) {
            self.base + rng.uniform(self.extra_min, self.extra_max)
        } else {
            self.base
        }
    }
}

/// Configuration-selected service model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ServicePolicy {
    Fixed(FixedService),
    Extended(ExtendedService),
}

impl ServicePolicy {
    /// `Extended` when `extended_service.probability > 0`, otherwise `Fixed`.
    pub fn from_config(config: &EtaConfig) -> TrafficResult<Self> {
        let base = config.service_time_min;
        if !base.is_finite() || base < 0.0 {
            return Err(TrafficError::InvalidServiceTime(base));
        }
        let x = &config.extended_service;
        if x.probability > 0.0 {
            Ok(ServicePolicy::Extended(ExtendedService::new(
                base,
                x.probability,
                x.extra_min,
                x.extra_max,
            )?))
        } else {
            Ok(ServicePolicy::Fixed(FixedService(base)))
        }
    }
}

impl ServiceModel for ServicePolicy {
    #[inline]
    fn dwell_minutes(&self, rng: &mut DriverRng) -> f64 {
        match self {
            ServicePolicy::Fixed(m)    => m.dwell_minutes(rng),
            ServicePolicy::Extended(m) => m.dwell_minutes(rng),
        }
    }
}
