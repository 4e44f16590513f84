//! Geographic coordinate type and planar helpers.
//!
//! `GeoPoint` stores double-precision latitude/longitude.  Users snap onto
//! node coordinates by copying them, so "exactly at" checks in the engine
//! are plain `==` comparisons and must never go through a lossy conversion.

use std::f64::consts::PI;

/// Earth radius used by every distance computation, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_388.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Symmetric, exactly `0.0` for coincident points, and never NaN: the
    /// haversine term is clamped to `[0, 1]` before the `atan2`, which covers
    /// both rounding just above 1 near antipodes and degenerate inputs.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let s_lat = (d_lat * 0.5).sin();
        let s_lon = (d_lon * 0.5).sin();
        let a = (s_lat * s_lat + lat1.cos() * lat2.cos() * s_lon * s_lon).clamp(0.0, 1.0);
        if a.is_nan() {
            return 0.0;
        }

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Move a fraction `t` of the way toward `target` in coordinate space.
    #[inline]
    pub fn lerp(self, target: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + t * (target.lat - self.lat),
            lon: self.lon + t * (target.lon - self.lon),
        }
    }

    /// Planar angle in `[0, π]` at `self` between the direction toward
    /// `toward` (where the user is heading) and the direction toward
    /// `target` (where a packet wants to go).
    ///
    /// Returns `Some(0.0)` when `target == self` (already there) and `None`
    /// when `toward == self`, i.e. the user has no heading.
    pub fn heading_angle(self, toward: GeoPoint, target: GeoPoint) -> Option<f64> {
        let (tx, ty) = (target.lat - self.lat, target.lon - self.lon);
        if tx == 0.0 && ty == 0.0 {
            return Some(0.0);
        }
        let (hx, hy) = (toward.lat - self.lat, toward.lon - self.lon);
        if hx == 0.0 && hy == 0.0 {
            return None;
        }
        let cross = hx * ty - hy * tx;
        let dot = hx * tx + hy * ty;
        Some(cross.abs().atan2(dot).clamp(0.0, PI))
    }

    /// Degree-space box test used to reject far-away pairs before calling
    /// `distance_m`.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lon)
    }
}
