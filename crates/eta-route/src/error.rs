use eta_core::{DriverId, EtaError, StopId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("driver {driver}: sequence {sequence} is used by both {first} and {second}")]
    DuplicateSequence {
        driver:   DriverId,
        sequence: u32,
        first:    StopId,
        second:   StopId,
    },

    #[error("driver {driver}: stop {stop} appears more than once")]
    DuplicateStop { driver: DriverId, stop: StopId },

    #[error("driver {driver}: stop {stop} has sequence 0; sequences start at 1")]
    InvalidSequence { driver: DriverId, stop: StopId },

    #[error("stop {stop} belongs to driver {found}, not {expected}")]
    ForeignStop {
        expected: DriverId,
        found:    DriverId,
        stop:     StopId,
    },

    #[error("route input parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] EtaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;
