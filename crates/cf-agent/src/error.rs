//! Agent-subsystem error type.

use thiserror::Error;

use cf_core::{PacketId, UserId};

use crate::packet::PacketState;

/// Errors produced by `cf-agent`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    #[error("cannot {action} {packet} while it is {state}")]
    InvalidTransition {
        packet: PacketId,
        state:  PacketState,
        action: &'static str,
    },

    #[error("{0} not found in population")]
    UnknownPacket(PacketId),

    #[error("{0} not found in population")]
    UnknownUser(UserId),
}

pub type AgentResult<T> = Result<T, AgentError>;
