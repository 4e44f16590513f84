use cf_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MobilityError {
    #[error("cluster model needs at least 2 reachable nodes, found {reachable}")]
    TooFewClusterCandidates { reachable: usize },

    #[error("spatial lookup failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
