//! Structured event records emitted by the engine.

use std::fmt;

use cf_core::{Cycle, GeoPoint, PacketId, UserId};

/// What happened to a packet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    /// A user stepped onto an uncarried packet.
    Pickup,
    /// The carrier stepped onto the packet's destination.
    Delivery,
    /// The carrier passed the packet to a user heading closer to its destination.
    Handover,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Pickup   => "pickup",
            EventKind::Delivery => "delivery",
            EventKind::Handover => "handover",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One packet event.
///
/// `user` is the actor: the picker, the deliverer, or the giving carrier of
/// a handover.  `counterpart` is the receiver of a handover and `None`
/// otherwise.  `pos` is where `user` stood.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogRecord {
    pub cycle:       Cycle,
    pub kind:        EventKind,
    pub user:        UserId,
    pub counterpart: Option<UserId>,
    pub packet:      PacketId,
    pub pos:         GeoPoint,
}
