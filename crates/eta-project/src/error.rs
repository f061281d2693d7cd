use eta_core::{DriverId, EtaError};
use eta_route::RouteError;
use eta_traffic::TrafficError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("projector configuration error: {0}")]
    Config(#[from] EtaError),

    #[error("traffic model error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("invalid route: {0}")]
    Route(#[from] RouteError),

    #[error("driver {0} has stops but no position")]
    MissingPosition(DriverId),

    #[error("position for {position} cannot drive the route of {route}")]
    DriverMismatch { position: DriverId, route: DriverId },
}

pub type ProjectResult<T> = Result<T, ProjectError>;
