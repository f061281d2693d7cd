//! The `TrafficModel` trait and its implementations.

use eta_core::{DriverRng, TrafficPolicyKind, TrafficSettings};

use crate::{TrafficError, TrafficResult};

fn check_range(min: f64, max: f64) -> TrafficResult<()> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(TrafficError::InvalidRange { min, max })
    }
}

fn check_probability(p: f64) -> TrafficResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(TrafficError::InvalidProbability(p))
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Pluggable per-leg slowdown.
///
/// Called once per leg (current position → first stop, then stop to stop).
/// The returned multiplier scales free-flow travel time: `1.0` is free flow,
/// `2.0` doubles the leg.  Implementations keep no memory between calls.
///
/// # Thread safety
///
/// The fleet runner may project many drivers in parallel against one model,
/// so implementations must be `Send + Sync`.
pub trait TrafficModel: Send + Sync {
    fn sample(&self, rng: &mut DriverRng) -> f64;
}

impl<T: TrafficModel + ?Sized> TrafficModel for Box<T> {
    fn sample(&self, rng: &mut DriverRng) -> f64 {
        (**self).sample(rng)
    }
}

// ── FixedTraffic ──────────────────────────────────────────────────────────────

/// Always returns the same multiplier.  Draws nothing from the RNG.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedTraffic(pub f64);

impl FixedTraffic {
    /// Free flow.
    pub const FREE_FLOW: FixedTraffic = FixedTraffic(1.0);
}

impl TrafficModel for FixedTraffic {
    #[inline]
    fn sample(&self, _rng: &mut DriverRng) -> f64 {
        self.0
    }
}

// ── UniformTraffic ────────────────────────────────────────────────────────────

/// Uniform over the closed range `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformTraffic {
    min: f64,
    max: f64,
}

impl UniformTraffic {
    pub fn new(min: f64, max: f64) -> TrafficResult<Self> {
        check_range(min, max)?;
        Ok(Self { min, max })
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl TrafficModel for UniformTraffic {
    #[inline]
    fn sample(&self, rng: &mut DriverRng) -> f64 {
        rng.uniform(self.min, self.max)
    }
}

// ── TieredTraffic ─────────────────────────────────────────────────────────────

/// One band of a tiered distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tier {
    /// Chance of picking this tier, given that earlier tiers were not picked.
    pub probability: f64,
    pub min:         f64,
    pub max:         f64,
}

/// Congested-day traffic: heavy, else moderate, else normal.
///
/// Each tier is tried in turn with its own conditional probability; the last
/// band is the fall-through.  With the defaults:
///
/// ```text
/// P(heavy)    = 0.30            multiplier ∈ [2.0, 3.5]
/// P(moderate) = 0.70 × 0.50     multiplier ∈ [1.5, 2.0]
/// P(normal)   = 0.70 × 0.50     multiplier ∈ [0.8, 1.2]
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TieredTraffic {
    pub heavy:    Tier,
    pub moderate: Tier,
    /// `probability` is ignored: reached whenever neither tier above fires.
    pub normal:   Tier,
}

impl Default for TieredTraffic {
    fn default() -> Self {
        Self {
            heavy:    Tier { probability: 0.3, min: 2.0, max: 3.5 },
            moderate: Tier { probability: 0.5, min: 1.5, max: 2.0 },
            normal:   Tier { probability: 1.0, min: 0.8, max: 1.2 },
        }
    }
}

impl TieredTraffic {
    pub fn new(heavy: Tier, moderate: Tier, normal: Tier) -> TrafficResult<Self> {
        for tier in [&heavy, &moderate] {
            check_probability(tier.probability)?;
        }
        for tier in [&heavy, &moderate, &normal] {
            check_range(tier.min, tier.max)?;
        }
        Ok(Self { heavy, moderate, normal })
    }
}

impl TrafficModel for TieredTraffic {
    fn sample(&self, rng: &mut DriverRng) -> f64 {
        let tier = if rng.gen_bool(self.heavy.probability) {
            &self.heavy
        } else if rng.gen_bool(self.moderate.probability) {
            &self.moderate
        } else {
            &self.normal
        };
        rng.uniform(tier.min, tier.max)
    }
}

// ── TrafficPolicy ─────────────────────────────────────────────────────────────

/// Configuration-selected traffic model.
///
/// Lets the application pick a strategy at runtime while the projector stays
/// generic over a single concrete type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrafficPolicy {
    Fixed(FixedTraffic),
    Uniform(UniformTraffic),
    Tiered(TieredTraffic),
}

impl TrafficPolicy {
    pub fn from_settings(settings: &TrafficSettings) -> TrafficResult<Self> {
        Ok(match settings.policy {
            TrafficPolicyKind::Fixed => {
                check_range(settings.fixed, settings.fixed)?;
                TrafficPolicy::Fixed(FixedTraffic(settings.fixed))
            }
            TrafficPolicyKind::Uniform => {
                TrafficPolicy::Uniform(UniformTraffic::new(settings.min, settings.max)?)
            }
            TrafficPolicyKind::Tiered => TrafficPolicy::Tiered(TieredTraffic::default()),
        })
    }

    pub fn kind(&self) -> TrafficPolicyKind {
        match self {
            TrafficPolicy::Fixed(_)   => TrafficPolicyKind::Fixed,
            TrafficPolicy::Uniform(_) => TrafficPolicyKind::Uniform,
            TrafficPolicy::Tiered(_)  => TrafficPolicyKind::Tiered,
        }
    }
}

impl TrafficModel for TrafficPolicy {
    #[inline]
    fn sample(&self, rng: &mut DriverRng) -> f64 {
        match self {
            TrafficPolicy::Fixed(m)   => m.sample(rng),
            TrafficPolicy::Uniform(m) => m.sample(rng),
            TrafficPolicy::Tiered(m)  => m.sample(rng),
        }
    }
}
