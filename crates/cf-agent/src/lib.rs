//! `cf-agent`: mobile entity state for the carry-forward relay simulator.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`user`]   | `User` (position, path, carried packets, cooldowns, counters) |
//! | [`packet`] | `Packet`, `PacketState` and its checked transitions          |
//! | [`store`]  | `Population`: users + packets with cross-consistent updates  |
//! | [`error`]  | `AgentError`, `AgentResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `PacketState`.           |

pub mod error;
pub mod packet;
pub mod store;
pub mod user;


pub use error::{AgentError, AgentResult};
pub use packet::{Packet, PacketState};
pub use store::Population;
pub use user::User;
