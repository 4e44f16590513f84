//! Simulation observer trait for progress reporting and data collection.

use cf_core::{Cycle, GeoPoint, UserId};

use crate::{LogRecord, RunSummary};

/// Callbacks invoked by [`Sim`][crate::Sim] while it runs.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_event(&mut self, record: &LogRecord) {
///         if record.kind == EventKind::Delivery {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each cycle, before the pickup pass.
    fn on_cycle_start(&mut self, _cycle: Cycle) {}

    /// Called after the movement pass, before the counter advances.
    fn on_cycle_end(&mut self, _cycle: Cycle) {}

    /// Called for every pickup, delivery and handover, in the order they
    /// happen.
    fn on_event(&mut self, _record: &LogRecord) {}

    /// Called once per cycle for every unordered pair of users in range,
    /// lower id first.  `pos` is where the lower-id user stands.
    fn on_contact(&mut self, _cycle: Cycle, _a: UserId, _b: UserId, _pos: GeoPoint) {}

    /// Called by [`Sim::run`][crate::Sim::run] with the final statistics.
    fn on_summary(&mut self, _summary: &RunSummary) {}

    /// Called once after the last cycle of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_cycle: Cycle) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Collects every [`LogRecord`] in memory.
#[derive(Default, Debug)]
pub struct RecordLog {
    pub records: Vec<LogRecord>,
}

impl SimObserver for RecordLog {
    fn on_event(&mut self, record: &LogRecord) {
        self.records.push(*record);
    }
}
