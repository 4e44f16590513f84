//! Plain data row types written by output backends.
//!
//! Ids are flattened to their integer values and `None` becomes an empty
//! CSV cell or SQL `NULL`.

use cf_sim::{LogRecord, PacketReport, RunSummary, UserReport};

/// One pickup, delivery or handover.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub cycle:       u64,
    /// `pickup`, `delivery` or `handover`.
    pub kind:        &'static str,
    pub user:        u32,
    pub counterpart: Option<u32>,
    pub packet:      u32,
    pub lat:         f64,
    pub lon:         f64,
}

impl From<&LogRecord> for EventRow {
    fn from(r: &LogRecord) -> Self {
        Self {
            cycle:       r.cycle.0,
            kind:        r.kind.as_str(),
            user:        r.user.0,
            counterpart: r.counterpart.map(|u| u.0),
            packet:      r.packet.0,
            lat:         r.pos.lat,
            lon:         r.pos.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacketRow {
    pub packet:       u32,
    pub delivered_at: Option<u64>,
    pub handovers:    u32,
    pub distance_m:   f64,
    pub shortest_m:   f64,
}

impl From<&PacketReport> for PacketRow {
    fn from(r: &PacketReport) -> Self {
        Self {
            packet:       r.id.0,
            delivered_at: r.delivered_at.map(|c| c.0),
            handovers:    r.handovers,
            distance_m:   r.distance_m,
            shortest_m:   r.shortest_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user:                u32,
    pub distance_m:          f64,
    pub carrying_distance_m: f64,
}

impl From<&UserReport> for UserRow {
    fn from(r: &UserReport) -> Self {
        Self {
            user:                r.id.0,
            distance_m:          r.distance_m,
            carrying_distance_m: r.carrying_distance_m,
        }
    }
}

/// Run totals.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub cycles:                u64,
    pub delivered:             u64,
    pub undelivered:           u64,
    pub avg_handovers:         Option<f64>,
    pub avg_delivery_cycle:    Option<f64>,
    pub avg_packet_distance_m: Option<f64>,
    pub avg_user_distance_m:   Option<f64>,
    pub min_visits:            u32,
    pub max_visits:            u32,
}

impl From<&RunSummary> for SummaryRow {
    fn from(s: &RunSummary) -> Self {
        Self {
            cycles:                s.cycles.0,
            delivered:             s.delivered as u64,
            undelivered:           s.undelivered as u64,
            avg_handovers:         s.avg_handovers,
            avg_delivery_cycle:    s.avg_delivery_cycle,
            avg_packet_distance_m: s.avg_packet_distance_m,
            avg_user_distance_m:   s.avg_user_distance_m,
            min_visits:            s.min_visits,
            max_visits:            s.max_visits,
        }
    }
}
