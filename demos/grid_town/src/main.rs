//! grid_town: a small carry-forward relay run on a synthetic street grid.
//!
//! Runs the same population size under both mobility models and writes each
//! run's event log and summary to `output/grid_town/<model>/`.  Set
//! `RUST_LOG=debug` to see every pickup, handover and delivery.

mod network;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use log::{LevelFilter, info};

use cf_core::{Cycle, GeoPoint, MobilityKind, SimConfig, UserId};
use cf_output::{CsvWriter, OutputWriter, SimOutputObserver};
use cf_sim::{LogRecord, RunSummary, SimBuilder, SimObserver};
use cf_spatial::ReachableStrategy;

use network::build_grid;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIZE:    usize = 16; // 256 intersections, enough for 5 clusters
const USER_COUNT:   usize = 60;
const PACKET_COUNT: usize = 12;
const SEED:         u64   = 42;
const MAX_CYCLES:   u64   = 200_000;

// ── Observer wrapper to count contacts ───────────────────────────────────────

struct ContactCounter<W: OutputWriter> {
    inner:    SimOutputObserver<W>,
    contacts: u64,
}

impl<W: OutputWriter> SimObserver for ContactCounter<W> {
    fn on_cycle_start(&mut self, cycle: Cycle) {
        self.inner.on_cycle_start(cycle);
    }

    fn on_cycle_end(&mut self, cycle: Cycle) {
        self.inner.on_cycle_end(cycle);
    }

    fn on_event(&mut self, record: &LogRecord) {
        self.inner.on_event(record);
    }

    fn on_contact(&mut self, _cycle: Cycle, _a: UserId, _b: UserId, _pos: GeoPoint) {
        self.contacts += 1;
    }

    fn on_summary(&mut self, summary: &RunSummary) {
        self.inner.on_summary(summary);
    }

    fn on_sim_end(&mut self, final_cycle: Cycle) {
        self.inner.on_sim_end(final_cycle);
    }
}

// ── One run ───────────────────────────────────────────────────────────────────

fn run_model(mobility: MobilityKind) -> Result<RunSummary> {
    let config = SimConfig {
        users:             USER_COUNT,
        packets:           PACKET_COUNT,
        mobility,
        seed:              SEED,
        max_cycles:        MAX_CYCLES,
        record_encounters: true,
        ..SimConfig::default()
    };

    let mut sim = SimBuilder::new(config, build_grid(GRID_SIZE))
        .reachable_strategy(ReachableStrategy::FloodFill)
        .build()?;
    if let Some(clusters) = sim.clusters() {
        println!("  {} clusters selected", clusters.len());
    }

    let dir = Path::new("output/grid_town").join(mobility.as_str());
    fs::create_dir_all(&dir)?;
    let mut obs = ContactCounter {
        inner:    SimOutputObserver::new(CsvWriter::new(&dir)?),
        contacts: 0,
    };

    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }
    fs::write(dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;

    let events = sim.encounters().map_or(0, |g| g.len());
    info!("{mobility}: {} contact observations, {events} contact events", obs.contacts);
    println!("  finished in {:.3} s, output in {}", elapsed.as_secs_f64(), dir.display());
    Ok(summary)
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    println!("=== grid_town: carry-forward relay ===");
    println!("Grid: {GRID_SIZE}×{GRID_SIZE}  |  Users: {USER_COUNT}  |  Packets: {PACKET_COUNT}  |  Seed: {SEED}");
    println!();

    let mut results = Vec::new();
    for mobility in [MobilityKind::RandomWaypoint, MobilityKind::ClusterWaypoint] {
        println!("{mobility}:");
        results.push((mobility, run_model(mobility)?));
    }
    println!();

    println!(
        "{:<18} {:>8} {:>10} {:>10} {:>14} {:>12}",
        "Model", "Cycles", "Delivered", "Handovers", "Avg delivery", "Avg path m"
    );
    println!("{}", "-".repeat(77));
    for (mobility, s) in &results {
        println!(
            "{:<18} {:>8} {:>10} {:>10} {:>14} {:>12}",
            mobility.as_str(),
            s.cycles.0,
            format!("{}/{}", s.delivered, s.delivered + s.undelivered),
            fmt_opt(s.avg_handovers),
            fmt_opt(s.avg_delivery_cycle),
            fmt_opt(s.avg_packet_distance_m),
        );
    }

    Ok(())
}
