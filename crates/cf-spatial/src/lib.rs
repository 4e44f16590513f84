//! `cf-spatial`: road network, spatial lookups, reachable set and routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`network`]   | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, `RawNode`, `RawWay`, `Bounds` |
//! | [`reachable`] | `ReachableStrategy`, flood-fill and probing component search |
//! | [`router`]    | `Router` trait, `Route`, `AStarRouter`, `DijkstraRouter`   |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the raw input types.    |

pub mod error;
pub mod network;
pub mod reachable;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use network::{Bounds, RawNode, RawWay, RoadNetwork, RoadNetworkBuilder};
pub use reachable::ReachableStrategy;
pub use router::{AStarRouter, DijkstraRouter, Route, Router};
