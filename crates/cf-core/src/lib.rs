//! `cf-core`: foundational types for the carry-forward relay simulator.
//!
//! This crate is a dependency of every other `cf-*` crate.  It has no
//! `cf-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `UserId`, `PacketId`, `NodeId`, `RawNodeId`           |
//! | [`geo`]         | `GeoPoint`, great-circle distance, heading angle      |
//! | [`time`]        | `Cycle`, `SimClock`                                   |
//! | [`config`]      | `SimConfig`, `MobilityKind`                           |
//! | [`rng`]         | `SimRng` (the single simulation stream)               |
//! | [`error`]       | `CfError`, `CfResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MobilityKind, SimConfig};
pub use error::{CfError, CfResult};
pub use geo::GeoPoint;
pub use ids::{NodeId, PacketId, RawNodeId, UserId};
pub use rng::SimRng;
pub use time::{Cycle, SimClock};
