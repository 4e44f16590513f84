//! Mobile users.

use std::collections::{BTreeSet, VecDeque};

use cf_core::{GeoPoint, NodeId, PacketId, UserId};

/// A pedestrian carrying a phone.
///
/// Users stand exactly on node coordinates whenever they reach a node, so
/// position comparisons against packets and destinations are exact.
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub pos: GeoPoint,

    /// Nodes still to visit.  `path[0]` is the node currently walked toward.
    pub path: VecDeque<NodeId>,

    /// Packets held, in the order they were acquired.
    pub carried: Vec<PacketId>,

    /// Total metres walked.
    pub distance_m: f64,
    /// Metres walked while holding at least one packet.
    pub carrying_distance_m: f64,

    /// Cycles left before this user may trade or move again.
    pub trade_cooldown: u32,
    /// Cycles left to dwell at the current location.
    pub wait_cooldown: u32,

    /// Clusters this user has been to or is heading to (cluster model only).
    pub known_clusters: BTreeSet<NodeId>,
}

impl User {
    pub fn new(id: UserId, pos: GeoPoint, path: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            id,
            pos,
            path: path.into_iter().collect(),
            carried: Vec::new(),
            distance_m: 0.0,
            carrying_distance_m: 0.0,
            trade_cooldown: 0,
            wait_cooldown: 0,
            known_clusters: BTreeSet::new(),
        }
    }

    /// The node currently walked toward.
    #[inline]
    pub fn next_node(&self) -> Option<NodeId> {
        self.path.front().copied()
    }

    /// The end of the current path.
    #[inline]
    pub fn final_node(&self) -> Option<NodeId> {
        self.path.back().copied()
    }

    #[inline]
    pub fn is_carrying(&self) -> bool {
        !self.carried.is_empty()
    }

    #[inline]
    pub fn can_trade(&self) -> bool {
        self.trade_cooldown == 0
    }

    /// Replace the pending path.
    pub fn set_path(&mut self, path: impl IntoIterator<Item = NodeId>) {
        self.path.clear();
        self.path.extend(path);
    }
}
