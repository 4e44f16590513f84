//! Routing trait, A* and Dijkstra implementations.
//!
//! # Pluggability
//!
//! `cf-sim` and `cf-mobility` call routing via the [`Router`] trait.  The
//! default [`AStarRouter`] uses great-circle distance to the goal as its
//! heuristic; since every road's length is the great-circle distance between
//! its endpoints, the heuristic is admissible and consistent and the first
//! time the goal is popped its cost is optimal.  [`DijkstraRouter`] is the
//! zero-heuristic variant, kept as a reference for optimality checks.
//!
//! # Re-entrancy
//!
//! A search never writes to the network.  Cost and predecessor maps are
//! allocated per call, so any number of searches may share one
//! `&RoadNetwork` concurrently.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use cf_core::NodeId;

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes to visit in order.  Excludes the start, includes the goal.
    pub nodes: Vec<NodeId>,
    /// Sum of road lengths along the route, in metres.
    pub length_m: f64,
}

impl Route {
    /// `true` if the start and goal are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes strictly between start and goal.
    pub fn interior(&self) -> &[NodeId] {
        match self.nodes.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so the end-of-run statistics pass
/// can fan searches out over Rayon workers.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields a trivial empty route.  Unreachable goals yield
    /// [`SpatialError::NoRoute`]; ids outside the network yield
    /// [`SpatialError::NodeNotFound`].
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route>;
}

/// A* with the great-circle heuristic.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        search(network, from, to, true)
    }
}

/// Uniform-cost search (A* with a zero heuristic).
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        search(network, from, to, false)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Total order over finite costs for the heap key.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn search(network: &RoadNetwork, from: NodeId, to: NodeId, heuristic: bool) -> SpatialResult<Route> {
    for n in [from, to] {
        if !network.contains(n) {
            return Err(SpatialError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Route { nodes: vec![], length_m: 0.0 });
    }

    let goal_pos = network.pos(to);
    let h = |n: NodeId| if heuristic { network.pos(n).distance_m(goal_pos) } else { 0.0 };

    let n = network.node_count();
    // g[v] = best known path cost to v.
    let mut g      = vec![f64::INFINITY; n];
    let mut prev   = vec![NodeId::INVALID; n];
    let mut closed = vec![false; n];

    g[from.index()] = 0.0;

    // Min-heap on f = g + h.  Secondary key NodeId ensures deterministic
    // tie-breaking.  Improved costs push a fresh entry; stale ones are
    // skipped on pop.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(h(from)), from)));

    while let Some(Reverse((_, node))) = heap.pop() {
        if closed[node.index()] {
            continue;
        }
        if node == to {
            return Ok(reconstruct(&prev, from, to, g[to.index()]));
        }
        closed[node.index()] = true;

        let cost = g[node.index()];
        for (neighbor, length_m) in network.neighbors(node) {
            if closed[neighbor.index()] {
                continue;
            }
            let new_cost = cost + length_m;
            if new_cost < g[neighbor.index()] {
                g[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((Cost(new_cost + h(neighbor)), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId, length_m: f64) -> Route {
    let mut nodes = Vec::new();
    let mut cur = to;
    while cur != from {
        nodes.push(cur);
        cur = prev[cur.index()];
    }
    nodes.reverse();
    Route { nodes, length_m }
}
