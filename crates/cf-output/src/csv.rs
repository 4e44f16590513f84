//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `events.csv`
//! - `packets.csv`
//! - `users.csv`
//! - `summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult, PacketRow, SummaryRow, UserRow};

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes simulation output to four CSV files.
pub struct CsvWriter {
    events:   Writer<File>,
    packets:  Writer<File>,
    users:    Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["cycle", "kind", "user", "counterpart", "packet", "lat", "lon"])?;

        let mut packets = Writer::from_path(dir.join("packets.csv"))?;
        packets.write_record(["packet", "delivered_at", "handovers", "distance_m", "shortest_m"])?;

        let mut users = Writer::from_path(dir.join("users.csv"))?;
        users.write_record(["user", "distance_m", "carrying_distance_m"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record([
            "cycles",
            "delivered",
            "undelivered",
            "avg_handovers",
            "avg_delivery_cycle",
            "avg_packet_distance_m",
            "avg_user_distance_m",
            "min_visits",
            "max_visits",
        ])?;

        Ok(Self {
            events,
            packets,
            users,
            summary,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.cycle.to_string(),
                row.kind.to_owned(),
                row.user.to_string(),
                opt(row.counterpart),
                row.packet.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_packets(&mut self, rows: &[PacketRow]) -> OutputResult<()> {
        for row in rows {
            self.packets.write_record(&[
                row.packet.to_string(),
                opt(row.delivered_at),
                row.handovers.to_string(),
                row.distance_m.to_string(),
                row.shortest_m.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_users(&mut self, rows: &[UserRow]) -> OutputResult<()> {
        for row in rows {
            self.users.write_record(&[
                row.user.to_string(),
                row.distance_m.to_string(),
                row.carrying_distance_m.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.cycles.to_string(),
            row.delivered.to_string(),
            row.undelivered.to_string(),
            opt(row.avg_handovers),
            opt(row.avg_delivery_cycle),
            opt(row.avg_packet_distance_m),
            opt(row.avg_user_distance_m),
            row.min_visits.to_string(),
            row.max_visits.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.packets.flush()?;
        self.users.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
