//! Reachable-set extraction.
//!
//! Users spawn on, and walk toward, nodes of the reachable set only.  Both
//! strategies partition the in-bounds nodes into disjoint components and keep
//! the largest; ties go to the component found first.  Every member lies
//! strictly inside the bounds and has at least one neighbour.
//!
//! | Strategy    | Cost                       | Result                         |
//! |-------------|----------------------------|--------------------------------|
//! | `FloodFill` | O(N + E), no RNG           | exact largest in-bounds component |
//! | `Probing`   | one A* search per probe    | probabilistic approximation    |

use std::collections::VecDeque;

use log::{debug, trace};

use cf_core::{NodeId, SimRng};

use crate::network::RoadNetwork;
use crate::router::{AStarRouter, Router};

/// How `RoadNetwork::build_reachable_set` finds the component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReachableStrategy {
    /// Breadth-first search restricted to in-bounds nodes.
    #[default]
    FloodFill,
    /// Grow each component by routing from a seed to random candidates.
    Probing,
}

fn in_bounds_mask(net: &RoadNetwork) -> Vec<bool> {
    let bounds = net.bounds();
    (0..net.node_count())
        .map(|i| {
            let n = NodeId(i as u32);
            net.degree(n) > 0 && bounds.contains(net.pos(n))
        })
        .collect()
}

/// Largest connected component of the subgraph induced by in-bounds nodes.
pub(crate) fn flood_fill(net: &RoadNetwork) -> Vec<NodeId> {
    let eligible = in_bounds_mask(net);
    let mut seen = vec![false; net.node_count()];
    let mut best: Vec<NodeId> = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..net.node_count() {
        if !eligible[seed] || seen[seed] {
            continue;
        }
        seen[seed] = true;
        queue.push_back(NodeId(seed as u32));
        let mut component = Vec::new();
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for (next, _) in net.neighbors(node) {
                if eligible[next.index()] && !seen[next.index()] {
                    seen[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        trace!("flood fill: component of {} from {}", component.len(), seed);
        if component.len() > best.len() {
            best = component;
        }
    }
    best
}

/// Probabilistic component search.
///
/// Take the first unassigned in-bounds node as seed.  Repeatedly draw a
/// candidate from the pool and route seed → candidate: on success every
/// in-bounds node of the route joins the component and leaves the pool; on
/// failure only the candidate leaves.  Repeat with fresh seeds while the
/// unassigned remainder could still beat the largest component.
pub(crate) fn probe(net: &RoadNetwork, rng: &mut SimRng) -> Vec<NodeId> {
    let eligible = in_bounds_mask(net);
    let mut unassigned: Vec<NodeId> = (0..net.node_count())
        .filter(|&i| eligible[i])
        .map(|i| NodeId(i as u32))
        .collect();

    let router = AStarRouter;
    let mut best: Vec<NodeId> = Vec::new();
    let mut member = vec![false; net.node_count()];

    while unassigned.len() > best.len() {
        let seed = unassigned[0];
        let mut component = vec![seed];
        member[seed.index()] = true;

        let mut pool = unassigned.clone();
        let mut probes = 0usize;
        while let Some(x) = rng.index(pool.len()) {
            let candidate = pool.swap_remove(x);
            if member[candidate.index()] {
                continue;
            }
            probes += 1;
            if let Ok(route) = router.route(net, seed, candidate) {
                for n in route.nodes {
                    if eligible[n.index()] && !member[n.index()] {
                        member[n.index()] = true;
                        component.push(n);
                    }
                }
            }
        }
        debug!("probing: component of {} from {} after {} searches", component.len(), seed, probes);

        unassigned.retain(|n| !member[n.index()]);
        if component.len() > best.len() {
            best = component;
        }
    }
    best
}
