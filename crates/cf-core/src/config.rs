//! Run configuration.
//!
//! `SimConfig` is fixed at construction.  Drivers typically build it in code
//! or deserialize it from JSON with the `serde` feature; the mobility model
//! can also be given by name through `MobilityKind::from_str`.

use std::fmt;
use std::str::FromStr;

use crate::error::{CfError, CfResult};
use crate::time::SimClock;

// ── MobilityKind ──────────────────────────────────────────────────────────────

/// Which movement model every user follows for the whole run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MobilityKind {
    /// Walk to a uniformly random reachable node, repeat.
    #[default]
    RandomWaypoint,
    /// Walk between weighted attraction points, dwelling at each.
    ClusterWaypoint,
}

impl MobilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MobilityKind::RandomWaypoint => "random_waypoint",
            MobilityKind::ClusterWaypoint => "cluster_waypoint",
        }
    }
}

impl fmt::Display for MobilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MobilityKind {
    type Err = CfError;

    /// Accepts `random_waypoint`/`random`/`rwp` and
    /// `cluster_waypoint`/`cluster`, case-insensitively.
    fn from_str(s: &str) -> CfResult<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random_waypoint" | "random" | "rwp" => Ok(MobilityKind::RandomWaypoint),
            "cluster_waypoint" | "cluster" => Ok(MobilityKind::ClusterWaypoint),
            other => Err(CfError::Config(format!("unknown mobility model `{other}`"))),
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of mobile users.
    pub users: usize,

    /// Number of packets spawned at setup.
    pub packets: usize,

    /// Proximity radius in metres; a pair is "in contact" when strictly closer.
    pub bluetooth_range_m: f64,

    /// Movement model for every user.
    pub mobility: MobilityKind,

    /// Cycles both parties sit out after a handover.
    pub trade_delay_cycles: u32,

    /// Walking speed in metres per second.  Default: 1.4.
    pub speed_mps: f64,

    /// Simulated milliseconds per cycle.  Default: 1000.
    pub step_ms: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Upper bound on cycles executed by `Sim::run`.  Default: one week of
    /// one-second cycles.
    pub max_cycles: u64,

    /// Maintain the encounter graph while running.
    pub record_encounters: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            users:              100,
            packets:            10,
            bluetooth_range_m:  10.0,
            mobility:           MobilityKind::RandomWaypoint,
            trade_delay_cycles: 10,
            speed_mps:          1.4,
            step_ms:            1_000,
            seed:               0,
            max_cycles:         604_800,
            record_encounters:  false,
        }
    }
}

impl SimConfig {
    /// Distance a moving user covers in one cycle, in metres.
    #[inline]
    pub fn step_distance_m(&self) -> f64 {
        self.speed_mps * self.step_ms as f64 / 1_000.0
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.step_ms)
    }

    /// Reject configurations the engine cannot start with.
    pub fn validate(&self) -> CfResult<()> {
        if self.users == 0 {
            return Err(CfError::Config("user count must be positive".into()));
        }
        if self.packets == 0 {
            return Err(CfError::Config("packet count must be positive".into()));
        }
        if !(self.bluetooth_range_m > 0.0) {
            return Err(CfError::Config(format!(
                "bluetooth range must be positive, got {}",
                self.bluetooth_range_m
            )));
        }
        if !(self.step_distance_m() > 0.0) {
            return Err(CfError::Config(format!(
                "per-cycle travel distance must be positive (speed {} m/s, step {} ms)",
                self.speed_mps, self.step_ms
            )));
        }
        Ok(())
    }
}
