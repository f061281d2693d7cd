use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("invalid multiplier range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("invalid service time: {0}")]
    InvalidServiceTime(f64),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
