//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Cycle` counter.  Each cycle runs the
//! pickup, delivery, negotiation and movement passes once.  The mapping to
//! simulated wall time is held in `SimClock`:
//!
//!   elapsed_ms = cycle * step_ms
//!
//! Cooldowns, dwell times and delivery timestamps are all whole cycles, so
//! schedule arithmetic stays exact.

use std::fmt;

// ── Cycle ────────────────────────────────────────────────────────────────────

/// An absolute cycle counter.  Cycle 0 is the first cycle executed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle(pub u64);

impl Cycle {
    pub const ZERO: Cycle = Cycle(0);

    /// Return the cycle `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Cycle {
        Cycle(self.0 + n)
    }

    /// Cycles elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Cycle) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Cycle {
    type Output = Cycle;
    #[inline]
    fn add(self, rhs: u64) -> Cycle {
        Cycle(self.0 + rhs)
    }
}

impl std::ops::Sub for Cycle {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Cycle) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current cycle and converts it to simulated elapsed time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds represented by one cycle.  Default: 1000.
    pub step_ms: u32,
    /// The cycle about to run; advanced by `advance()` after each step.
    pub current: Cycle,
}

impl SimClock {
    pub fn new(step_ms: u32) -> Self {
        Self { step_ms, current: Cycle::ZERO }
    }

    /// Advance the clock by one cycle.
    #[inline]
    pub fn advance(&mut self) {
        self.current = Cycle(self.current.0 + 1);
    }

    /// Elapsed simulated milliseconds since cycle 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current.0 * self.step_ms as u64
    }

    /// Break elapsed time into (day, hour, minute) components.
    /// Useful for human-readable logging without a datetime library.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.elapsed_ms() / 1_000;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }

    /// How many cycles span `secs` simulated seconds (rounded up).
    #[inline]
    pub fn cycles_for_secs(&self, secs: u64) -> u64 {
        (secs * 1_000).div_ceil(self.step_ms.max(1) as u64)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.current, d, h, m)
    }
}
