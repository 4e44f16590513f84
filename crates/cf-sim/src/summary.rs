//! End-of-run statistics.
//!
//! Averages cover delivered packets only and are `None` when nothing was
//! delivered.  Every packet gets a report, in id order, including the
//! shortest road distance from its origin to its destination for comparison
//! with the distance it actually travelled.

use cf_agent::{Packet, Population};
use cf_core::{Cycle, PacketId, UserId};
use cf_spatial::{RoadNetwork, Router};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketReport {
    pub id:           PacketId,
    pub delivered_at: Option<Cycle>,
    pub handovers:    u32,
    /// Metres travelled while carried.
    pub distance_m:   f64,
    /// Road distance origin → destination; 0 when they coincide or no
    /// route exists.
    pub shortest_m:   f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserReport {
    pub id:                  UserId,
    pub distance_m:          f64,
    pub carrying_distance_m: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Cycles executed.
    pub cycles:                Cycle,
    pub delivered:             usize,
    pub undelivered:           usize,
    pub avg_handovers:         Option<f64>,
    pub avg_delivery_cycle:    Option<f64>,
    pub avg_packet_distance_m: Option<f64>,
    /// Over all users.
    pub avg_user_distance_m:   Option<f64>,
    pub min_visits:            u32,
    pub max_visits:            u32,
    pub packets:               Vec<PacketReport>,
    pub users:                 Vec<UserReport>,
}

impl RunSummary {
    pub fn delivery_ratio(&self) -> f64 {
        let total = self.delivered + self.undelivered;
        if total == 0 { 0.0 } else { self.delivered as f64 / total as f64 }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn shortest_m<R: Router + ?Sized>(net: &RoadNetwork, router: &R, p: &Packet) -> f64 {
    router
        .route(net, p.origin_node, p.destination_node)
        .map_or(0.0, |r| r.length_m)
}

pub(crate) fn summarize<R: Router + ?Sized>(
    net:        &RoadNetwork,
    router:     &R,
    population: &Population,
    cycles:     Cycle,
) -> RunSummary {
    let packets = population.packets();

    #[cfg(not(feature = "parallel"))]
    let shortest: Vec<f64> = packets.iter().map(|p| shortest_m(net, router, p)).collect();

    #[cfg(feature = "parallel")]
    let shortest: Vec<f64> = {
        use rayon::prelude::*;
        packets.par_iter().map(|p| shortest_m(net, router, p)).collect()
    };

    let reports: Vec<PacketReport> = packets
        .iter()
        .zip(shortest)
        .map(|(p, shortest_m)| PacketReport {
            id: p.id,
            delivered_at: p.delivered_at(),
            handovers: p.handovers,
            distance_m: p.distance_m,
            shortest_m,
        })
        .collect();

    let delivered = || reports.iter().filter(|r| r.delivered_at.is_some());
    let users: Vec<UserReport> = population
        .users()
        .iter()
        .map(|u| UserReport {
            id: u.id,
            distance_m: u.distance_m,
            carrying_distance_m: u.carrying_distance_m,
        })
        .collect();

    RunSummary {
        cycles,
        delivered: population.delivered().len(),
        undelivered: population.in_flight().len(),
        avg_handovers: mean(delivered().map(|r| f64::from(r.handovers))),
        avg_delivery_cycle: mean(delivered().filter_map(|r| r.delivered_at).map(|c| c.0 as f64)),
        avg_packet_distance_m: mean(delivered().map(|r| r.distance_m)),
        avg_user_distance_m: mean(users.iter().map(|u| u.distance_m)),
        min_visits: net.min_visits(),
        max_visits: net.max_visits(),
        packets: reports,
        users,
    }
}
