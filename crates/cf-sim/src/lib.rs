//! `cf-sim`: cycle engine for the carry-forward relay simulator.
//!
//! # Cycle loop
//!
//! ```text
//! every cycle:
//!   ① Pickup        uncarried packets (id order) × users (id order):
//!                     on the packet → pick it up; in range → head for it.
//!   ② Delivery      users × carried packets:
//!                     on the destination → deliver; in range → head for it.
//!   ③ Negotiation   report in-range pairs as contacts, then for every
//!                     ordered pair that may trade, hand each packet to the
//!                     user whose heading points closer to its destination.
//!   ④ Movement      trade cooldown, else dwell, else walk one step;
//!                     plan the next leg when the path runs out.
//!   ⑤ Advance the cycle counter.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Computes the summary's shortest distances with Rayon.   |
//! | `fx-hash`  | FxHash inside the encounter graph.                       |
//! | `serde`    | Serialize/Deserialize on records and summaries.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cf_core::SimConfig;
//! use cf_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, network).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("delivered {} of {}", summary.delivered, summary.delivered + summary.undelivered);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod record;
pub mod sim;
pub mod summary;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RecordLog, SimObserver};
pub use record::{EventKind, LogRecord};
pub use sim::Sim;
pub use summary::{PacketReport, RunSummary, UserReport};
