//! Spatial-subsystem error type.

use thiserror::Error;

use cf_core::NodeId;

/// Errors produced by `cf-spatial`.
///
/// `NoRoute` and `NodeNotFound` are ordinary outcomes in the simulation hot
/// path; callers match on them and fall back rather than abort.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("reachable node set is empty")]
    EmptyReachableSet,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
