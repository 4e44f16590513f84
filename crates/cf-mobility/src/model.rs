//! Movement models as a tagged variant.

use std::collections::BTreeSet;

use log::trace;

use cf_core::{NodeId, SimRng};
use cf_spatial::{RoadNetwork, Router};

use crate::clusters::ClusterSet;
use crate::dwell::DwellProfile;

/// Route attempts per leg before a user gives up and stays put.
pub const MAX_PLAN_ATTEMPTS: usize = 8;

/// The next stretch of a user's walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leg {
    /// New pending path.  Never empty.
    pub path: Vec<NodeId>,
    /// Cycles to dwell before walking it.
    pub wait: u32,
}

impl Leg {
    /// Stay on `node` with no dwell.
    pub fn stay(node: NodeId) -> Self {
        Leg { path: vec![node], wait: 0 }
    }
}

/// The movement model every user follows, fixed for a run.
#[derive(Clone, Debug, PartialEq)]
pub enum Mobility {
    /// Walk to a uniformly random reachable node, repeat.
    RandomWaypoint,
    /// Walk between weighted clusters, dwelling at each.
    ClusterWaypoint(ClusterSet),
}

impl Mobility {
    pub fn clusters(&self) -> Option<&ClusterSet> {
        match self {
            Mobility::RandomWaypoint => None,
            Mobility::ClusterWaypoint(c) => Some(c),
        }
    }

    /// Plan the leg that follows path exhaustion at `from`.
    ///
    /// `known` is the user's known-cluster set; the cluster model adds the
    /// leg's goal to it.  Every route attempt that fails (no route, or the
    /// target is `from` itself) draws a new target, up to
    /// [`MAX_PLAN_ATTEMPTS`]; after that the user stays on `from`.
    pub fn plan_leg<R: Router + ?Sized>(
        &self,
        net: &RoadNetwork,
        router: &R,
        from: NodeId,
        known: &mut BTreeSet<NodeId>,
        rng: &mut SimRng,
    ) -> Leg {
        match self {
            Mobility::RandomWaypoint => random_waypoint(net, router, from, rng),
            Mobility::ClusterWaypoint(clusters) => cluster_waypoint(net, router, clusters, from, known, rng),
        }
    }
}

/// Route `from → target` for up to `MAX_PLAN_ATTEMPTS` targets.
fn first_route<R, F>(net: &RoadNetwork, router: &R, from: NodeId, mut target: F) -> Option<Vec<NodeId>>
where
    R: Router + ?Sized,
    F: FnMut() -> Option<NodeId>,
{
    for _ in 0..MAX_PLAN_ATTEMPTS {
        let to = target()?;
        match router.route(net, from, to) {
            Ok(route) if !route.is_trivial() => return Some(route.nodes),
            Ok(_) => trace!("plan: target {to} is the current node, redrawing"),
            Err(e) => trace!("plan: {e}, redrawing"),
        }
    }
    None
}

fn random_waypoint<R: Router + ?Sized>(net: &RoadNetwork, router: &R, from: NodeId, rng: &mut SimRng) -> Leg {
    match first_route(net, router, from, || net.random_reachable_node(rng).ok()) {
        Some(path) => Leg { path, wait: 0 },
        None => {
            trace!("random waypoint: no leg from {from}, staying");
            Leg::stay(from)
        }
    }
}

fn cluster_waypoint<R: Router + ?Sized>(
    net: &RoadNetwork,
    router: &R,
    clusters: &ClusterSet,
    from: NodeId,
    known: &mut BTreeSet<NodeId>,
    rng: &mut SimRng,
) -> Leg {
    let known_weight: u32 = known.iter().map(|&n| net.cluster_weight(n)).sum();
    let x: f64 = rng.gen_range(0.0..2.0);

    // The more a user already knows, the more likely it returns.
    if x <= f64::from(known_weight) / 10.0 {
        let candidates: Vec<NodeId> = known.iter().copied().filter(|&n| n != from).collect();
        let weights: Vec<u32> = candidates.iter().map(|&n| net.cluster_weight(n)).collect();
        if weights.iter().any(|&w| w > 0) {
            let path = first_route(net, router, from, || rng.weighted_index(&weights).map(|i| candidates[i]));
            return match path {
                Some(path) => {
                    let wait = DwellProfile::RETURN.draw(rng);
                    Leg { path, wait }
                }
                None => Leg::stay(from),
            };
        }
        trace!("cluster waypoint: nothing known besides {from}, exploring");
    }

    match first_route(net, router, from, || clusters.pick(rng)) {
        Some(path) => {
            if let Some(&goal) = path.last() {
                known.insert(goal);
            }
            let wait = DwellProfile::EXPLORE.draw(rng);
            Leg { path, wait }
        }
        None => {
            trace!("cluster waypoint: no leg from {from}, staying");
            Leg::stay(from)
        }
    }
}
