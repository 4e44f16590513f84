//! Road network representation and builder.
//!
//! # Data layout
//!
//! Roads are undirected; each one is stored as two directed entries in
//! **Compressed Sparse Row (CSR)** format.  Given a `NodeId n`, its
//! neighbours occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! sorted by neighbour id, with the matching great-circle lengths in
//! `edge_length_m`.  Iterating a node's neighbours is a contiguous scan.
//!
//! # Mutable node state
//!
//! The topology is frozen once built.  Two per-node counters stay writable
//! for the engine: `visits` (how often a user stepped onto the node) and
//! `cluster_weight` (0 = not a cluster).  Path-search state is never stored
//! here; every search allocates its own cost map.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  It
//! backs both the exact `node_at` lookup and best-effort `snap_to_node`.

use std::collections::HashMap;

use log::info;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use cf_core::{GeoPoint, NodeId, RawNodeId, SimRng};

use crate::reachable::{self, ReachableStrategy};
use crate::{SpatialError, SpatialResult};

// ── Ingestion types ───────────────────────────────────────────────────────────

/// A map node as produced by the ingestion collaborator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNode {
    pub id:  RawNodeId,
    pub pos: GeoPoint,
}

/// An ordered sequence of node references (a street or footpath).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawWay {
    pub id:   i64,
    pub refs: Vec<RawNodeId>,
}

/// Map extent.  "Inside" is strict on all four sides.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub top:    f64,
    pub bottom: f64,
    pub left:   f64,
    pub right:  f64,
}

impl Bounds {
    /// Bounds that contain every finite coordinate.
    pub const UNBOUNDED: Bounds = Bounds {
        top:    f64::INFINITY,
        bottom: f64::NEG_INFINITY,
        left:   f64::NEG_INFINITY,
        right:  f64::INFINITY,
    };

    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self { top, bottom, left, right }
    }

    #[inline]
    pub fn contains(&self, pos: GeoPoint) -> bool {
        pos.lon > self.left && pos.lon < self.right && pos.lat > self.bottom && pos.lat < self.top
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::UNBOUNDED
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus a spatial index.
///
/// Do not construct directly; use [`RoadNetworkBuilder`] or
/// [`RoadNetwork::construct`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Ingestion id of each node.  Indexed by `NodeId`.
    pub node_raw_id: Vec<RawNodeId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Neighbour at the far end of each directed entry.
    pub edge_to: Vec<NodeId>,

    /// Great-circle length of each directed entry in metres.
    pub edge_length_m: Vec<f64>,

    // ── Mutable per-node counters ─────────────────────────────────────────
    visits:         Vec<u32>,
    cluster_weight: Vec<u32>,

    // ── Derived sets and indices ──────────────────────────────────────────
    bounds:         Bounds,
    reachable:      Vec<NodeId>,
    reachable_mask: Vec<bool>,
    raw_index:      HashMap<RawNodeId, NodeId>,
    spatial_idx:    RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Build a network from ingested nodes, ways and bounds.
    ///
    /// Shorthand for `RoadNetworkBuilder::from_parts(..).build()`.
    pub fn construct(nodes: &[RawNode], ways: &[RawWay], bounds: Bounds) -> Self {
        RoadNetworkBuilder::from_parts(nodes, ways, bounds).build()
    }

    /// Construct an empty network with no nodes or roads.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of undirected roads.
    pub fn road_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    #[inline]
    pub fn pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn raw_id(&self, node: NodeId) -> RawNodeId {
        self.node_raw_id[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(neighbour, length_m)` pairs of `node`, ascending by
    /// neighbour id.  No heap allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(move |i| (self.edge_to[i], self.edge_length_m[i]))
    }

    /// Number of distinct neighbours of `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Reachable set ─────────────────────────────────────────────────────

    /// Nodes usable as spawn points and targets, ascending by id.
    pub fn reachable(&self) -> &[NodeId] {
        &self.reachable
    }

    #[inline]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.reachable_mask.get(node.index()).copied().unwrap_or(false)
    }

    /// Recompute the reachable set with the given strategy.
    ///
    /// `FloodFill` ignores `rng`; `Probing` draws from it.
    pub fn build_reachable_set(&mut self, strategy: ReachableStrategy, rng: &mut SimRng) {
        let set = match strategy {
            ReachableStrategy::FloodFill => reachable::flood_fill(self),
            ReachableStrategy::Probing   => reachable::probe(self, rng),
        };
        self.set_reachable(set);
        info!(
            "reachable set rebuilt ({:?}): {} of {} nodes",
            strategy,
            self.reachable.len(),
            self.node_count()
        );
    }

    fn set_reachable(&mut self, mut set: Vec<NodeId>) {
        set.sort_unstable();
        self.reachable_mask = vec![false; self.node_count()];
        for &n in &set {
            self.reachable_mask[n.index()] = true;
        }
        self.reachable = set;
    }

    /// Uniform draw from the reachable set.
    pub fn random_reachable_node(&self, rng: &mut SimRng) -> SpatialResult<NodeId> {
        rng.index(self.reachable.len())
            .map(|i| self.reachable[i])
            .ok_or(SpatialError::EmptyReachableSet)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Node located exactly at `pos`, if any.
    pub fn node_at(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .filter(|e| e.point == [pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Node carrying the ingestion id `raw`, if it survived the build.
    pub fn node_by_raw_id(&self, raw: RawNodeId) -> Option<NodeId> {
        self.raw_index.get(&raw).copied()
    }

    /// Nearest node to `pos` in coordinate space.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    // ── Visit statistics ──────────────────────────────────────────────────

    #[inline]
    pub fn record_visit(&mut self, node: NodeId) {
        self.visits[node.index()] += 1;
    }

    #[inline]
    pub fn visits(&self, node: NodeId) -> u32 {
        self.visits[node.index()]
    }

    /// Smallest visit count over all nodes; 0 for an empty network.
    pub fn min_visits(&self) -> u32 {
        self.visits.iter().copied().min().unwrap_or(0)
    }

    /// Largest visit count over all nodes; 0 for an empty network.
    pub fn max_visits(&self) -> u32 {
        self.visits.iter().copied().max().unwrap_or(0)
    }

    // ── Cluster weights ───────────────────────────────────────────────────

    #[inline]
    pub fn cluster_weight(&self, node: NodeId) -> u32 {
        self.cluster_weight[node.index()]
    }

    pub fn set_cluster_weight(&mut self, node: NodeId, weight: u32) {
        self.cluster_weight[node.index()] = weight;
    }

    /// Reset every node to "not a cluster".
    pub fn clear_cluster_weights(&mut self) {
        self.cluster_weight.fill(0);
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// `build()` collapses self-links and duplicate roads, drops nodes left
/// without neighbours (compacting ids while preserving insertion order),
/// constructs the CSR arrays, bulk-loads the R-tree and computes the
/// reachable set by flood fill.
///
/// # Example
///
/// ```
/// use cf_core::{GeoPoint, RawNodeId};
/// use cf_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(RawNodeId(1), GeoPoint::new(48.10, 11.50));
/// let c = b.add_node(RawNodeId(2), GeoPoint::new(48.11, 11.50));
/// b.add_road(a, c);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.road_count(), 1);
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_ids:   Vec<RawNodeId>,
    raw_edges: Vec<RawEdge>,
    bounds:    Bounds,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:     Vec::new(),
            raw_ids:   Vec::new(),
            raw_edges: Vec::new(),
            bounds:    Bounds::UNBOUNDED,
        }
    }

    /// Build from ingested parts.
    ///
    /// Nodes are deduplicated by id (first occurrence wins) and only nodes
    /// referenced by some way are kept, numbered in first-reference order.
    /// A reference to an unknown id breaks the way's chain at that point.
    pub fn from_parts(nodes: &[RawNode], ways: &[RawWay], bounds: Bounds) -> Self {
        let mut known: HashMap<RawNodeId, GeoPoint> = HashMap::with_capacity(nodes.len());
        for n in nodes {
            known.entry(n.id).or_insert(n.pos);
        }

        let mut b = Self::new().with_bounds(bounds);
        let mut interned: HashMap<RawNodeId, NodeId> = HashMap::new();
        for way in ways {
            let mut prev: Option<NodeId> = None;
            for raw in &way.refs {
                let Some(&pos) = known.get(raw) else {
                    prev = None;
                    continue;
                };
                let id = *interned.entry(*raw).or_insert_with(|| b.add_node(*raw, pos));
                if let Some(p) = prev {
                    b.add_road(p, id);
                }
                prev = Some(id);
            }
        }
        b
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Add a node and return its builder id (sequential from 0).
    pub fn add_node(&mut self, raw: RawNodeId, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.raw_ids.push(raw);
        id
    }

    /// Link `a` and `b` in both directions, weighted by their great-circle
    /// distance.  Self-links are ignored and return `false`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let length_m = self.nodes[a.index()].distance_m(self.nodes[b.index()]);
        self.raw_edges.push(RawEdge { from: a, to: b, length_m });
        self.raw_edges.push(RawEdge { from: b, to: a, length_m });
        true
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        // Sort by (source, target) and collapse duplicate roads.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| (e.from.0, e.to.0));
        raw.dedup_by_key(|e| (e.from.0, e.to.0));

        // Drop isolated nodes; surviving ids keep their relative order.
        let mut has_road = vec![false; self.nodes.len()];
        for e in &raw {
            has_road[e.from.index()] = true;
        }
        let mut remap = vec![NodeId::INVALID; self.nodes.len()];
        let mut node_pos = Vec::with_capacity(self.nodes.len());
        let mut node_raw_id = Vec::with_capacity(self.nodes.len());
        for (i, keep) in has_road.iter().enumerate() {
            if *keep {
                remap[i] = NodeId(node_pos.len() as u32);
                node_pos.push(self.nodes[i]);
                node_raw_id.push(self.raw_ids[i]);
            }
        }
        let node_count = node_pos.len();
        let dropped = self.nodes.len() - node_count;

        let edge_to: Vec<NodeId> = raw.iter().map(|e| remap[e.to.index()]).collect();
        let edge_length_m: Vec<f64> = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[remap[e.from.index()].index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let mut raw_index = HashMap::with_capacity(node_count);
        for (i, raw_id) in node_raw_id.iter().enumerate() {
            raw_index.entry(*raw_id).or_insert(NodeId(i as u32));
        }

        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let mut net = RoadNetwork {
            node_pos,
            node_raw_id,
            node_out_start,
            edge_to,
            edge_length_m,
            visits: vec![0; node_count],
            cluster_weight: vec![0; node_count],
            bounds: self.bounds,
            reachable: Vec::new(),
            reachable_mask: Vec::new(),
            raw_index,
            spatial_idx,
        };
        let set = reachable::flood_fill(&net);
        net.set_reachable(set);

        info!(
            "road network built: {} nodes ({} isolated dropped), {} roads, {} reachable",
            net.node_count(),
            dropped,
            net.road_count(),
            net.reachable.len()
        );
        net
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
