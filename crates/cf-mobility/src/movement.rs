//! Per-cycle walking and path redirection.

use log::trace;

use cf_core::{GeoPoint, NodeId};
use cf_spatial::{RoadNetwork, Router};

/// Outcome of one cycle of walking toward a node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Advance {
    /// The node was within reach; the walker now stands exactly on it.
    Arrived { travelled_m: f64 },
    /// The walker moved `step_m` along the straight line to `pos`.
    EnRoute { pos: GeoPoint, travelled_m: f64 },
}

impl Advance {
    pub fn travelled_m(self) -> f64 {
        match self {
            Advance::Arrived { travelled_m } | Advance::EnRoute { travelled_m, .. } => travelled_m,
        }
    }
}

/// Walk from `pos` toward `target` for one cycle covering at most `step_m`.
pub fn advance(pos: GeoPoint, target: GeoPoint, step_m: f64) -> Advance {
    let dist = pos.distance_m(target);
    if dist <= step_m {
        Advance::Arrived { travelled_m: dist }
    } else {
        Advance::EnRoute { pos: pos.lerp(target, step_m / dist), travelled_m: step_m }
    }
}

/// New pending path that keeps `next` (the node currently walked toward)
/// and continues from it to `target`.
///
/// Falls back to `[next]` when `target` cannot be reached, so the walker
/// stays on course for the node it was already heading to.
pub fn redirect<R: Router + ?Sized>(net: &RoadNetwork, router: &R, next: NodeId, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![next];
    match router.route(net, next, target) {
        Ok(route) => path.extend(route.nodes),
        Err(e) => trace!("redirect {next} → {target}: {e}, keeping course"),
    }
    path
}
