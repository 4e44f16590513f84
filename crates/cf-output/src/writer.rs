//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EventRow, OutputResult, PacketRow, SummaryRow, UserRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Append a batch of pickup, delivery and handover events.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write the per-packet report, one row per packet.
    fn write_packets(&mut self, rows: &[PacketRow]) -> OutputResult<()>;

    /// Write the per-user report, one row per user.
    fn write_users(&mut self, rows: &[UserRow]) -> OutputResult<()>;

    /// Write the run totals.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
