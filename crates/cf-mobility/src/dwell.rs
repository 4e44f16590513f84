//! Dwell times at cluster targets.
//!
//! A dwell is drawn in two steps: a uniform `[0, 1)` draw picks the band
//! according to the profile, then a uniform draw inside the band picks the
//! number of cycles.

use std::ops::Range;

use cf_core::SimRng;

/// Duration band of a stay, in cycles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DwellBand {
    Short,
    Medium,
    Long,
}

impl DwellBand {
    pub fn cycles(self) -> Range<u32> {
        match self {
            DwellBand::Short  => 300..600,
            DwellBand::Medium => 1_800..7_200,
            DwellBand::Long   => 14_400..288_800,
        }
    }
}

/// Cumulative band probabilities: `x < short` → short, `x < medium` →
/// medium, else long.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DwellProfile {
    pub short:  f64,
    pub medium: f64,
}

impl DwellProfile {
    /// Newly discovered cluster: 65 % short, 25 % medium, 10 % long.
    pub const EXPLORE: DwellProfile = DwellProfile { short: 0.65, medium: 0.90 };
    /// Revisited cluster: 50 % short, 30 % medium, 20 % long.
    pub const RETURN: DwellProfile = DwellProfile { short: 0.50, medium: 0.80 };

    pub fn band(self, x: f64) -> DwellBand {
        if x < self.short {
            DwellBand::Short
        } else if x < self.medium {
            DwellBand::Medium
        } else {
            DwellBand::Long
        }
    }

    pub fn draw(self, rng: &mut SimRng) -> u32 {
        let band = self.band(rng.random::<f64>());
        rng.gen_range(band.cycles())
    }
}
