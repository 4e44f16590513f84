use cf_agent::AgentError;
use cf_core::CfError;
use cf_mobility::MobilityError;
use cf_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("road network error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("population error: {0}")]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Core(#[from] CfError),
}

impl SimError {
    /// Lift a core error, keeping configuration problems as `Config`.
    pub(crate) fn from_core(e: CfError) -> Self {
        match e {
            CfError::Config(msg) => SimError::Config(msg),
            other => SimError::Core(other),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
