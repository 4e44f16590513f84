//! `cf-contact`: who met whom, where, and for how long.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`graph`] | `EncounterGraph`, `ContactEvent`, `MovementEdge`               |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on events and edges.      |
//! | `fx-hash` | FxHash for the user → latest-event map.                     |

pub mod graph;


pub use graph::{ContactEvent, EncounterGraph, EventIndex, MovementEdge};
