//! The encounter graph.
//!
//! Nodes are contact events: two users within range of each other over a
//! span of cycles.  A directed movement edge links each user's previous
//! contact event to their next one, so following a user's edges walks
//! their encounters in time order.
//!
//! The graph only grows.  Nothing is ever removed, so `EventIndex` values
//! handed out stay valid for the lifetime of the graph.

use log::trace;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use cf_core::{Cycle, GeoPoint, UserId};

#[cfg(feature = "fx-hash")]
type LatestMap = rustc_hash::FxHashMap<UserId, EventIndex>;
#[cfg(not(feature = "fx-hash"))]
type LatestMap = std::collections::HashMap<UserId, EventIndex>;

/// Stable handle of a contact event.
pub type EventIndex = NodeIndex<u32>;

/// Two users in range of each other from `start` until `end` (exclusive).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactEvent {
    /// The pair, in the order first observed.
    pub users: [UserId; 2],
    /// Where the first user stood when the contact began.
    pub pos:   GeoPoint,
    pub start: Cycle,
    pub end:   Cycle,
}

impl ContactEvent {
    pub fn involves(&self, user: UserId) -> bool {
        self.users.contains(&user)
    }

    /// Number of cycles covered.
    pub fn duration(&self) -> u64 {
        self.end.since(self.start)
    }
}

/// `user` went from the source event to the target event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementEdge {
    pub user: UserId,
}

#[derive(Default)]
pub struct EncounterGraph {
    graph:  DiGraph<ContactEvent, MovementEdge>,
    latest: LatestMap,
}

impl EncounterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `u` and `v` are in range during `cycle`, with `u`
    /// standing at `pos`.
    ///
    /// If both users' most recent event is the same one, it is extended
    /// to cover `cycle`.  Otherwise a new event is appended and each user
    /// gets a movement edge from their previous event.  Returns the event
    /// that covers this observation.
    ///
    /// Only the pair's shared latest event is ever extended.  When three or
    /// more users stay in range of each other, each pair observation moves
    /// the others' latest pointer, so the group opens fresh events and
    /// edges every cycle rather than growing one interval per pair.
    pub fn observe(&mut self, u: UserId, v: UserId, pos: GeoPoint, cycle: Cycle) -> EventIndex {
        let prev_u = self.latest(u);
        let prev_v = self.latest(v);

        if let (Some(a), Some(b)) = (prev_u, prev_v) {
            if a == b {
                let event = &mut self.graph[a];
                event.end = event.end.max(cycle + 1);
                return a;
            }
        }

        let idx = self.graph.add_node(ContactEvent { users: [u, v], pos, start: cycle, end: cycle + 1 });
        for (user, prev) in [(u, prev_u), (v, prev_v)] {
            if let Some(prev) = prev {
                self.graph.add_edge(prev, idx, MovementEdge { user });
            }
            self.latest.insert(user, idx);
        }
        trace!("contact {u} ↔ {v} opened at {cycle}");
        idx
    }

    // ── Read-only access ──────────────────────────────────────────────────

    pub fn graph(&self) -> &DiGraph<ContactEvent, MovementEdge> {
        &self.graph
    }

    /// The most recent event `user` took part in.
    pub fn latest(&self, user: UserId) -> Option<EventIndex> {
        self.latest.get(&user).copied()
    }

    pub fn event(&self, idx: EventIndex) -> Option<&ContactEvent> {
        self.graph.node_weight(idx)
    }

    /// All events in creation order.
    pub fn contact_events(&self) -> impl Iterator<Item = (EventIndex, &ContactEvent)> + '_ {
        self.graph.node_indices().map(move |i| (i, &self.graph[i]))
    }

    /// All movement edges as `(from, to, edge)`, in creation order.
    pub fn movement_edges(&self) -> impl Iterator<Item = (EventIndex, EventIndex, &MovementEdge)> + '_ {
        self.graph.edge_references().map(|e| (e.source(), e.target(), e.weight()))
    }

    /// Events `user` took part in, oldest first.
    pub fn timeline(&self, user: UserId) -> Vec<EventIndex> {
        let mut events = Vec::new();
        let mut at = self.latest(user);
        while let Some(idx) = at {
            events.push(idx);
            at = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .find(|e| e.weight().user == user)
                .map(|e| e.source());
        }
        events.reverse();
        events
    }

    /// Number of contact events.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
