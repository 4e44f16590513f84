//! Weighted attraction points for the cluster-waypoint model.
//!
//! # Sizing
//!
//! | Quantity        | Value                                       |
//! |-----------------|---------------------------------------------|
//! | target count    | `max(reachable / 50, 2)`, capped at `reachable` |
//! | big (weight 4)  | `⌊15 % · count⌋`                            |
//! | medium (weight 2) | `⌊25 % · count⌋`                          |
//! | small (weight 1) | the rest, so always the majority          |
//!
//! Clusters are distinct reachable nodes, drawn small first, then medium,
//! then big.  Their weights are written to the road network so renderers and
//! statistics can read them per node.

use log::info;

use cf_core::{NodeId, SimRng};
use cf_spatial::RoadNetwork;

use crate::{MobilityError, MobilityResult};

/// Reachable nodes per cluster.
pub const NODES_PER_CLUSTER: usize = 50;
/// Fewest clusters selected on any map.
pub const MIN_CLUSTERS: usize = 2;

/// Shares of the target count, in percent.
pub const BIG_PERCENT:    usize = 15;
pub const MEDIUM_PERCENT: usize = 25;

pub const SMALL_WEIGHT:  u32 = 1;
pub const MEDIUM_WEIGHT: u32 = 2;
pub const BIG_WEIGHT:    u32 = 4;

/// The cluster nodes of one run, in selection order.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSet {
    nodes:   Vec<NodeId>,
    weights: Vec<u32>,
}

impl ClusterSet {
    /// Select clusters from `net`'s reachable set and write their weights
    /// to the network (clearing any previous ones).
    pub fn select(net: &mut RoadNetwork, rng: &mut SimRng) -> MobilityResult<Self> {
        let reachable = net.reachable().len();
        if reachable < MIN_CLUSTERS {
            return Err(MobilityError::TooFewClusterCandidates { reachable });
        }

        let count = (reachable / NODES_PER_CLUSTER).max(MIN_CLUSTERS).min(reachable);
        let big = count * BIG_PERCENT / 100;
        let medium = count * MEDIUM_PERCENT / 100;
        let small = count - big - medium;

        let mut taken = vec![false; net.node_count()];
        let mut set = ClusterSet { nodes: Vec::with_capacity(count), weights: Vec::with_capacity(count) };
        for (n, weight) in [(small, SMALL_WEIGHT), (medium, MEDIUM_WEIGHT), (big, BIG_WEIGHT)] {
            let mut added = 0;
            while added < n {
                let node = net.random_reachable_node(rng)?;
                if !taken[node.index()] {
                    taken[node.index()] = true;
                    set.nodes.push(node);
                    set.weights.push(weight);
                    added += 1;
                }
            }
        }

        net.clear_cluster_weights();
        for (&node, &w) in set.nodes.iter().zip(&set.weights) {
            net.set_cluster_weight(node, w);
        }
        info!(
            "selected {} clusters ({} small, {} medium, {} big) from {} reachable nodes",
            count, small, medium, big, reachable
        );
        Ok(set)
    }

    /// Build from explicit `(node, weight)` pairs.  Zero weights are kept
    /// but can never be drawn.
    pub fn from_weighted(pairs: impl IntoIterator<Item = (NodeId, u32)>) -> Self {
        let (nodes, weights) = pairs.into_iter().unzip();
        ClusterSet { nodes, weights }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// `(node, weight)` pairs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.nodes.iter().copied().zip(self.weights.iter().copied())
    }

    pub fn weight_of(&self, node: NodeId) -> u32 {
        self.iter().find(|(n, _)| *n == node).map_or(0, |(_, w)| w)
    }

    pub fn total_weight(&self) -> u32 {
        self.weights.iter().sum()
    }

    /// Draw a cluster with probability proportional to its weight.
    pub fn pick(&self, rng: &mut SimRng) -> Option<NodeId> {
        rng.weighted_index(&self.weights).map(|i| self.nodes[i])
    }

    /// Draw a cluster other than `exclude`, proportional to weight.
    pub fn pick_excluding(&self, exclude: NodeId, rng: &mut SimRng) -> Option<NodeId> {
        let weights: Vec<u32> = self
            .iter()
            .map(|(n, w)| if n == exclude { 0 } else { w })
            .collect();
        rng.weighted_index(&weights).map(|i| self.nodes[i])
    }
}
