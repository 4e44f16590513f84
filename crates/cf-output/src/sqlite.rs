//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! four tables: `events`, `packets`, `users` and `summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult, PacketRow, SummaryRow, UserRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 cycle       INTEGER NOT NULL,
                 kind        TEXT    NOT NULL,
                 user        INTEGER NOT NULL,
                 counterpart INTEGER,
                 packet      INTEGER NOT NULL,
                 lat         REAL    NOT NULL,
                 lon         REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS packets (
                 packet       INTEGER PRIMARY KEY,
                 delivered_at INTEGER,
                 handovers    INTEGER NOT NULL,
                 distance_m   REAL    NOT NULL,
                 shortest_m   REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS users (
                 user                INTEGER PRIMARY KEY,
                 distance_m          REAL NOT NULL,
                 carrying_distance_m REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS summary (
                 cycles                INTEGER NOT NULL,
                 delivered             INTEGER NOT NULL,
                 undelivered           INTEGER NOT NULL,
                 avg_handovers         REAL,
                 avg_delivery_cycle    REAL,
                 avg_packet_distance_m REAL,
                 avg_user_distance_m   REAL,
                 min_visits            INTEGER NOT NULL,
                 max_visits            INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (cycle, kind, user, counterpart, packet, lat, lon) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.cycle as i64,
                    row.kind,
                    row.user,
                    row.counterpart,
                    row.packet,
                    row.lat,
                    row.lon,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_packets(&mut self, rows: &[PacketRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO packets (packet, delivered_at, handovers, distance_m, shortest_m) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.packet,
                    row.delivered_at.map(|c| c as i64),
                    row.handovers,
                    row.distance_m,
                    row.shortest_m,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_users(&mut self, rows: &[UserRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO users (user, distance_m, carrying_distance_m) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.user, row.distance_m, row.carrying_distance_m])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO summary (cycles, delivered, undelivered, avg_handovers, avg_delivery_cycle, \
             avg_packet_distance_m, avg_user_distance_m, min_visits, max_visits) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.cycles as i64,
                row.delivered as i64,
                row.undelivered as i64,
                row.avg_handovers,
                row.avg_delivery_cycle,
                row.avg_packet_distance_m,
                row.avg_user_distance_m,
                row.min_visits,
                row.max_visits,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
