//! `cf-mobility`: movement models and path advancement.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`model`]    | `Mobility` (tagged variant), `Leg`, `plan_leg`                  |
//! | [`clusters`] | `ClusterSet`: weighted attraction points for the cluster model  |
//! | [`dwell`]    | `DwellBand`, `DwellProfile`: randomized stay durations          |
//! | [`movement`] | `advance` (one cycle of walking), `redirect` (path toward a target) |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                            |
//!
//! # Movement model
//!
//! Users walk node to node along a pending path at a fixed distance per
//! cycle and never pass more than one node in a cycle:
//!
//! 1. `advance` moves the user toward `path[0]`.  If the node is within the
//!    cycle's travel distance the user snaps exactly onto it; otherwise the
//!    user moves that distance along the straight line.
//! 2. When the path runs out, `Mobility::plan_leg` picks the next target
//!    and dwell time for the configured model.
//!
//! `plan_leg` is a plain function of `(current node, model state, rng)`;
//! the engine owns all mutation of users.

pub mod clusters;
pub mod dwell;
pub mod error;
pub mod model;
pub mod movement;


pub use clusters::ClusterSet;
pub use dwell::{DwellBand, DwellProfile};
pub use error::{MobilityError, MobilityResult};
pub use model::{Leg, MAX_PLAN_ATTEMPTS, Mobility};
pub use movement::{Advance, advance, redirect};
