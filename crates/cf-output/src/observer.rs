//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use log::warn;

use cf_core::Cycle;
use cf_sim::{LogRecord, RunSummary, SimObserver};

use crate::row::{EventRow, PacketRow, SummaryRow, UserRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes event records and the run summary to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Events are buffered per cycle and written as one batch at the end of the
/// cycle.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `sim.run()` returns,
/// check for errors with [`take_error`][Self::take_error].  A driver that
/// stops the sim itself calls `sim.finish(&mut obs)` first, which writes the
/// summary and finishes the writer.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_events(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output writer failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, record: &LogRecord) {
        self.pending.push(EventRow::from(record));
    }

    fn on_cycle_end(&mut self, _cycle: Cycle) {
        self.flush_events();
    }

    fn on_summary(&mut self, summary: &RunSummary) {
        self.flush_events();
        let packets: Vec<PacketRow> = summary.packets.iter().map(PacketRow::from).collect();
        let result = self.writer.write_packets(&packets);
        self.store_err(result);

        let users: Vec<UserRow> = summary.users.iter().map(UserRow::from).collect();
        let result = self.writer.write_users(&users);
        self.store_err(result);

        let result = self.writer.write_summary(&SummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_cycle: Cycle) {
        self.flush_events();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
