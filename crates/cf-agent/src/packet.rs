//! Packets and their lifecycle.
//!
//! ```text
//!   Uncarried ──pick_up──▶ Carried(u) ──deliver──▶ Delivered(cycle)
//!                            │    ▲
//!                            └────┘ hand_over
//! ```
//!
//! The state is a single enum, so "exactly one of uncarried / carried /
//! delivered" holds by construction.  Any edge not drawn above is rejected
//! with [`AgentError::InvalidTransition`] and leaves the packet untouched.

use std::fmt;

use cf_core::{Cycle, GeoPoint, NodeId, PacketId, UserId};

use crate::{AgentError, AgentResult};

/// Where a packet is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketState {
    /// Lying at its origin, waiting for a user to step onto it.
    Uncarried,
    /// Travelling with a user.
    Carried(UserId),
    /// Dropped at the destination during the given cycle.  Terminal.
    Delivered(Cycle),
}

impl fmt::Display for PacketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketState::Uncarried    => f.write_str("uncarried"),
            PacketState::Carried(u)   => write!(f, "carried by {u}"),
            PacketState::Delivered(c) => write!(f, "delivered at {c}"),
        }
    }
}

/// A unit of data relayed hand to hand toward its destination.
#[derive(Clone, Debug)]
pub struct Packet {
    pub id: PacketId,

    /// Current position: the origin until picked up, then the carrier's.
    pub pos: GeoPoint,

    pub origin:           GeoPoint,
    pub origin_node:      NodeId,
    pub destination:      GeoPoint,
    pub destination_node: NodeId,

    /// Number of carrier changes after the initial pickup.
    pub handovers: u32,

    /// Metres travelled while carried.
    pub distance_m: f64,

    state: PacketState,
}

impl Packet {
    pub fn new(
        id: PacketId,
        origin_node: NodeId,
        origin: GeoPoint,
        destination_node: NodeId,
        destination: GeoPoint,
    ) -> Self {
        Self {
            id,
            pos: origin,
            origin,
            origin_node,
            destination,
            destination_node,
            handovers: 0,
            distance_m: 0.0,
            state: PacketState::Uncarried,
        }
    }

    #[inline]
    pub fn state(&self) -> PacketState {
        self.state
    }

    #[inline]
    pub fn carrier(&self) -> Option<UserId> {
        match self.state {
            PacketState::Carried(u) => Some(u),
            _ => None,
        }
    }

    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self.state, PacketState::Delivered(_))
    }

    pub fn delivered_at(&self) -> Option<Cycle> {
        match self.state {
            PacketState::Delivered(c) => Some(c),
            _ => None,
        }
    }

    fn reject(&self, action: &'static str) -> AgentError {
        AgentError::InvalidTransition { packet: self.id, state: self.state, action }
    }

    /// Uncarried → Carried(`user`).
    pub fn pick_up(&mut self, user: UserId) -> AgentResult<()> {
        match self.state {
            PacketState::Uncarried => {
                self.state = PacketState::Carried(user);
                Ok(())
            }
            _ => Err(self.reject("pick up")),
        }
    }

    /// Carried(`from`) → Carried(`to`), counting one handover.
    pub fn hand_over(&mut self, from: UserId, to: UserId) -> AgentResult<()> {
        match self.state {
            PacketState::Carried(c) if c == from && from != to => {
                self.state = PacketState::Carried(to);
                self.handovers += 1;
                Ok(())
            }
            _ => Err(self.reject("hand over")),
        }
    }

    /// Carried → Delivered(`cycle`).  Returns the former carrier.
    pub fn deliver(&mut self, cycle: Cycle) -> AgentResult<UserId> {
        match self.state {
            PacketState::Carried(c) => {
                self.state = PacketState::Delivered(cycle);
                Ok(c)
            }
            _ => Err(self.reject("deliver")),
        }
    }
}
