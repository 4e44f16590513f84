//! Integration tests for cf-sim.

use cf_agent::{Packet, Population, User};
use cf_core::{Cycle, GeoPoint, MobilityKind, NodeId, PacketId, RawNodeId, SimConfig, UserId};
use cf_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::{EventKind, LogRecord, NoopObserver, RecordLog, Sim, SimBuilder, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(users: usize, packets: usize) -> SimConfig {
    SimConfig {
        users,
        packets,
        bluetooth_range_m: 5.0,
        trade_delay_cycles: 10,
        seed: 42,
        max_cycles: 20_000,
        ..SimConfig::default()
    }
}

/// `len` nodes on the equator, `spacing` degrees of longitude apart.
fn line(len: usize, spacing: f64) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let ids: Vec<NodeId> = (0..len)
        .map(|i| b.add_node(RawNodeId(i as i64), GeoPoint::new(0.0, i as f64 * spacing)))
        .collect();
    for w in ids.windows(2) {
        b.add_road(w[0], w[1]);
    }
    b.build()
}

/// `w × h` lattice of ~11 m blocks.
fn grid(w: usize, h: usize) -> RoadNetwork {
    const STEP: f64 = 0.0001;
    let mut b = RoadNetworkBuilder::new();
    let mut ids = Vec::new();
    for r in 0..h {
        for c in 0..w {
            let raw = RawNodeId((r * w + c) as i64);
            ids.push(b.add_node(raw, GeoPoint::new(r as f64 * STEP, c as f64 * STEP)));
        }
    }
    for r in 0..h {
        for c in 0..w {
            let i = r * w + c;
            if c + 1 < w {
                b.add_road(ids[i], ids[i + 1]);
            }
            if r + 1 < h {
                b.add_road(ids[i], ids[i + w]);
            }
        }
    }
    b.build()
}

fn user(net: &RoadNetwork, id: u32, at: u32, path: &[u32]) -> User {
    User::new(UserId(id), net.pos(NodeId(at)), path.iter().map(|&n| NodeId(n)))
}

fn packet(net: &RoadNetwork, id: u32, origin: u32, destination: u32) -> Packet {
    let (o, d) = (NodeId(origin), NodeId(destination));
    Packet::new(PacketId(id), o, net.pos(o), d, net.pos(d))
}

/// A sim over `net` with hand-placed users and packets.
fn placed(net: RoadNetwork, config: SimConfig, population: Population) -> Sim {
    SimBuilder::new(config, net).population(population).build().unwrap()
}

fn random_sim(kind: MobilityKind, seed: u64) -> Sim {
    let config = SimConfig { mobility: kind, seed, ..test_config(20, 5) };
    SimBuilder::new(config, grid(5, 5)).build().unwrap()
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use cf_spatial::{Bounds, DijkstraRouter, ReachableStrategy, SpatialError};

    use super::*;
    use crate::SimError;

    #[test]
    fn spawns_configured_population() {
        let sim = random_sim(MobilityKind::RandomWaypoint, 1);
        assert_eq!(sim.users().len(), 20);
        assert_eq!(sim.packets().len(), 5);
        assert_eq!(sim.in_flight().len(), 5);
        assert!(sim.delivered().is_empty());
        assert_eq!(sim.cycle(), Cycle::ZERO);
        assert!(sim.clusters().is_none());
        assert!(sim.encounters().is_none());
        for u in sim.users() {
            let at = sim.network().node_at(u.pos).unwrap();
            assert!(sim.network().is_reachable(at));
            assert!(!u.path.is_empty());
            assert!(u.known_clusters.is_empty());
        }
        for p in sim.packets() {
            assert!(sim.network().is_reachable(p.origin_node));
            assert!(sim.network().is_reachable(p.destination_node));
        }
    }

    #[test]
    fn cluster_users_start_on_clusters() {
        let sim = random_sim(MobilityKind::ClusterWaypoint, 2);
        let clusters = sim.clusters().unwrap();
        assert_eq!(clusters.len(), 2);
        for u in sim.users() {
            let at = sim.network().node_at(u.pos).unwrap();
            assert!(clusters.nodes().contains(&at));
            assert!(u.known_clusters.contains(&at));
            assert!(u.known_clusters.contains(&u.final_node().unwrap()));
        }
        for p in sim.packets() {
            assert_ne!(p.origin_node, p.destination_node);
            assert!(clusters.nodes().contains(&p.origin_node));
            assert!(clusters.nodes().contains(&p.destination_node));
        }
    }

    #[test]
    fn invalid_config_errors() {
        for config in [
            SimConfig { users: 0, ..test_config(1, 1) },
            SimConfig { packets: 0, ..test_config(1, 1) },
            SimConfig { bluetooth_range_m: 0.0, ..test_config(1, 1) },
            SimConfig { speed_mps: 0.0, ..test_config(1, 1) },
        ] {
            let err = SimBuilder::new(config, grid(3, 3)).build().err().unwrap();
            assert!(matches!(err, SimError::Config(_)), "{err}");
        }
    }

    #[test]
    fn empty_network_errors() {
        let err = SimBuilder::new(test_config(1, 1), RoadNetwork::empty()).build().err().unwrap();
        assert!(matches!(err, SimError::Spatial(SpatialError::EmptyReachableSet)), "{err}");
    }

    #[test]
    fn cluster_model_needs_two_reachable_nodes() {
        let mut b = RoadNetworkBuilder::new().with_bounds(Bounds::new(1.0, -1.0, -1.0, 1.0));
        let inside = b.add_node(RawNodeId(1), GeoPoint::new(0.0, 0.0));
        let outside = b.add_node(RawNodeId(2), GeoPoint::new(5.0, 0.0));
        b.add_road(inside, outside);
        let config = SimConfig { mobility: MobilityKind::ClusterWaypoint, ..test_config(1, 1) };
        let err = SimBuilder::new(config, b.build()).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)), "{err}");
    }

    #[test]
    fn custom_router_and_probing_build() {
        let sim = SimBuilder::new(test_config(3, 2), grid(4, 4))
            .router(DijkstraRouter)
            .reachable_strategy(ReachableStrategy::Probing)
            .build()
            .unwrap();
        assert_eq!(sim.network().reachable().len(), 16);
    }

    #[test]
    fn encounter_graph_only_when_requested() {
        let config = SimConfig { record_encounters: true, ..test_config(2, 1) };
        let sim = SimBuilder::new(config, grid(3, 3)).build().unwrap();
        assert!(sim.encounters().unwrap().is_empty());
    }
}

// ── Pickup and delivery ───────────────────────────────────────────────────────

#[cfg(test)]
mod pickup_tests {
    use super::*;

    #[test]
    fn packet_at_start_is_picked_up_in_cycle_zero() {
        let net = line(5, 0.001);
        let pop = Population::new(vec![user(&net, 0, 0, &[1])], vec![packet(&net, 0, 0, 4)]);
        let mut sim = placed(net, test_config(1, 1), pop);

        let mut log = RecordLog::default();
        sim.step(&mut log).unwrap();
        assert_eq!(
            log.records,
            vec![LogRecord {
                cycle: Cycle(0),
                kind: EventKind::Pickup,
                user: UserId(0),
                counterpart: None,
                packet: PacketId(0),
                pos: GeoPoint::new(0.0, 0.0),
            }]
        );
        assert_eq!(sim.packets()[0].carrier(), Some(UserId(0)));
        // The packet moved with its carrier.
        assert_eq!(sim.packets()[0].pos, sim.users()[0].pos);
        assert!(sim.packets()[0].distance_m > 0.0);
    }

    #[test]
    fn only_the_first_user_on_the_packet_gets_it() {
        let net = line(5, 0.001);
        let users = vec![user(&net, 0, 2, &[3]), user(&net, 1, 2, &[1])];
        let pop = Population::new(users, vec![packet(&net, 0, 2, 4)]);
        let mut sim = placed(net, test_config(2, 1), pop);

        let mut log = RecordLog::default();
        sim.pickup_pass(Cycle(0), &mut log).unwrap();
        assert_eq!(log.records.len(), 1);
        assert_eq!(sim.packets()[0].carrier(), Some(UserId(0)));
        assert_eq!(sim.users()[0].carried, vec![PacketId(0)]);
        assert!(sim.users()[1].carried.is_empty());
    }

    #[test]
    fn user_in_range_heads_for_the_packet() {
        // ~2.2 m blocks, well inside the 5 m range.
        let net = line(5, 0.00002);
        let pop = Population::new(vec![user(&net, 0, 0, &[0])], vec![packet(&net, 0, 2, 4)]);
        let mut sim = placed(net, test_config(1, 1), pop);

        sim.pickup_pass(Cycle(0), &mut NoopObserver).unwrap();
        let path: Vec<NodeId> = sim.users()[0].path.iter().copied().collect();
        assert_eq!(path, vec![NodeId(0), NodeId(1), NodeId(2)]);

        let mut log = RecordLog::default();
        sim.run_cycles(10, &mut log).unwrap();
        assert!(log.records.iter().any(|r| r.kind == EventKind::Pickup));
    }

    #[test]
    fn carrier_on_destination_delivers() {
        let net = line(3, 0.001);
        let mut pop = Population::new(vec![user(&net, 0, 2, &[1])], vec![packet(&net, 0, 0, 2)]);
        pop.pick_up(UserId(0), PacketId(0)).unwrap();
        let mut sim = placed(net, test_config(1, 1), pop);

        let mut log = RecordLog::default();
        sim.delivery_pass(Cycle(7), &mut log).unwrap();
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].kind, EventKind::Delivery);
        assert_eq!(log.records[0].cycle, Cycle(7));
        assert_eq!(sim.packets()[0].delivered_at(), Some(Cycle(7)));
        assert!(sim.in_flight().is_empty());
        assert_eq!(sim.delivered(), &[PacketId(0)]);
        assert!(!sim.users()[0].is_carrying());
    }

    #[test]
    fn carrier_in_range_heads_for_destination() {
        let net = line(4, 0.00002);
        let mut pop = Population::new(vec![user(&net, 0, 1, &[0])], vec![packet(&net, 0, 1, 3)]);
        pop.pick_up(UserId(0), PacketId(0)).unwrap();
        let mut sim = placed(net, test_config(1, 1), pop);

        sim.delivery_pass(Cycle(0), &mut NoopObserver).unwrap();
        assert_eq!(sim.users()[0].final_node(), Some(NodeId(3)));
        assert_eq!(sim.users()[0].next_node(), Some(NodeId(0)));
        assert!(sim.delivered().is_empty());
    }
}

// ── Negotiation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod negotiation_tests {
    use super::*;

    /// Two users on node 2 of a 5-node line.  User 0 carries packet 0
    /// (destination node 4) and walks west along `carrier_path`; user 1
    /// walks along `receiver_path`.
    fn co_located(carrier_path: &[u32], receiver_path: &[u32]) -> Sim {
        let net = line(5, 0.001);
        let users = vec![user(&net, 0, 2, carrier_path), user(&net, 1, 2, receiver_path)];
        let mut pop = Population::new(users, vec![packet(&net, 0, 2, 4)]);
        pop.pick_up(UserId(0), PacketId(0)).unwrap();
        placed(net, test_config(2, 1), pop)
    }

    #[test]
    fn hands_over_to_better_heading() {
        let mut sim = co_located(&[1, 0], &[3, 4]);
        let mut log = RecordLog::default();
        sim.negotiation_pass(Cycle(3), &mut log).unwrap();

        let p = &sim.packets()[0];
        assert_eq!(p.carrier(), Some(UserId(1)));
        assert_eq!(p.handovers, 1);
        assert_eq!(sim.users()[0].trade_cooldown, 10);
        assert_eq!(sim.users()[1].trade_cooldown, 10);
        assert_eq!(sim.users()[1].carried, vec![PacketId(0)]);
        assert_eq!(
            log.records,
            vec![LogRecord {
                cycle: Cycle(3),
                kind: EventKind::Handover,
                user: UserId(0),
                counterpart: Some(UserId(1)),
                packet: PacketId(0),
                pos: sim.users()[0].pos,
            }]
        );
    }

    #[test]
    fn cooldown_prevents_bounce_back() {
        let mut sim = co_located(&[1, 0], &[3, 4]);
        sim.negotiation_pass(Cycle(0), &mut NoopObserver).unwrap();
        let mut log = RecordLog::default();
        sim.negotiation_pass(Cycle(1), &mut log).unwrap();
        assert!(log.records.is_empty());
        assert_eq!(sim.packets()[0].handovers, 1);
    }

    #[test]
    fn keeps_packet_when_receiver_is_no_better() {
        // Both head east toward the destination: equal angles, no transfer.
        let mut sim = co_located(&[3, 4], &[3, 4]);
        let mut log = RecordLog::default();
        sim.negotiation_pass(Cycle(0), &mut log).unwrap();
        assert!(log.records.is_empty());
        assert_eq!(sim.packets()[0].carrier(), Some(UserId(0)));
        assert_eq!(sim.users()[0].trade_cooldown, 0);
        assert_eq!(sim.users()[1].trade_cooldown, 0);
    }

    #[test]
    fn receiver_without_heading_is_skipped() {
        // User 1's path ends where it stands, so its heading is undefined.
        let mut sim = co_located(&[1, 0], &[2]);
        sim.negotiation_pass(Cycle(0), &mut NoopObserver).unwrap();
        assert_eq!(sim.packets()[0].carrier(), Some(UserId(0)));
    }

    #[test]
    fn carrier_without_heading_counts_as_facing_away() {
        // Carrier's path ends where it stands, so its angle counts as π.
        let mut sim = co_located(&[2], &[3]);
        sim.negotiation_pass(Cycle(0), &mut NoopObserver).unwrap();
        assert_eq!(sim.packets()[0].carrier(), Some(UserId(1)));
    }

    #[test]
    fn receiver_angle_never_exceeds_carrier_angle() {
        let mut sim = co_located(&[1, 0], &[3, 4]);
        let dest = sim.packets()[0].destination;
        let angle = |sim: &Sim, u: u32| {
            let user = &sim.users()[u as usize];
            let toward = sim.network().pos(user.final_node().unwrap());
            user.pos.heading_angle(toward, dest).unwrap()
        };
        let (carrier, receiver) = (angle(&sim, 0), angle(&sim, 1));
        sim.negotiation_pass(Cycle(0), &mut NoopObserver).unwrap();
        assert!(receiver <= carrier);
        assert_eq!(sim.packets()[0].handovers, 1);
    }

    #[test]
    fn out_of_range_users_do_not_trade() {
        let net = line(5, 0.001);
        let users = vec![user(&net, 0, 0, &[1]), user(&net, 1, 4, &[3])];
        let mut pop = Population::new(users, vec![packet(&net, 0, 0, 4)]);
        pop.pick_up(UserId(0), PacketId(0)).unwrap();
        let mut sim = placed(net, test_config(2, 1), pop);
        sim.negotiation_pass(Cycle(0), &mut NoopObserver).unwrap();
        assert_eq!(sim.packets()[0].carrier(), Some(UserId(0)));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn walks_one_step_per_cycle() {
        let net = line(2, 0.001);
        let pop = Population::new(vec![user(&net, 0, 0, &[1])], vec![packet(&net, 0, 1, 0)]);
        let mut sim = placed(net, test_config(1, 1), pop);
        sim.run_cycles(3, &mut NoopObserver).unwrap();

        let u = &sim.users()[0];
        assert!((u.distance_m - 4.2).abs() < 1e-9);
        assert_eq!(u.carrying_distance_m, 0.0);
        assert!((GeoPoint::new(0.0, 0.0).distance_m(u.pos) - 4.2).abs() < 1e-6);
        assert_eq!(sim.cycle(), Cycle(3));
    }

    #[test]
    fn arrival_snaps_counts_visit_and_replans() {
        let net = line(3, 0.001);
        let config = SimConfig { speed_mps: 500.0, ..test_config(1, 1) };
        let pop = Population::new(vec![user(&net, 0, 0, &[1])], vec![packet(&net, 0, 2, 0)]);
        let mut sim = placed(net, config, pop);
        sim.step(&mut NoopObserver).unwrap();

        let u = &sim.users()[0];
        assert_eq!(u.pos, sim.network().pos(NodeId(1)));
        assert_eq!(sim.network().visits(NodeId(1)), 1);
        assert!(!u.path.is_empty());
        assert_eq!(u.distance_m, GeoPoint::new(0.0, 0.0).distance_m(u.pos));
    }

    #[test]
    fn standing_on_next_node_does_not_count_a_visit() {
        let net = line(3, 0.001);
        let pop = Population::new(vec![user(&net, 0, 0, &[0])], vec![packet(&net, 0, 2, 1)]);
        let mut sim = placed(net, test_config(1, 1), pop);
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(sim.network().visits(NodeId(0)), 0);
        assert_eq!(sim.users()[0].distance_m, 0.0);
    }

    #[test]
    fn cooldowns_hold_users_in_place() {
        let net = line(2, 0.001);
        let mut users = vec![user(&net, 0, 0, &[1]), user(&net, 1, 0, &[1])];
        users[0].trade_cooldown = 2;
        users[1].wait_cooldown = 1;
        let pop = Population::new(users, vec![packet(&net, 0, 1, 0)]);
        let mut sim = placed(net, test_config(2, 1), pop);

        sim.movement_pass().unwrap();
        assert_eq!(sim.users()[0].trade_cooldown, 1);
        assert_eq!(sim.users()[1].wait_cooldown, 0);
        assert_eq!(sim.users()[0].distance_m, 0.0);
        assert_eq!(sim.users()[1].distance_m, 0.0);

        sim.movement_pass().unwrap();
        assert_eq!(sim.users()[0].trade_cooldown, 0);
        assert_eq!(sim.users()[0].distance_m, 0.0);
        assert!(sim.users()[1].distance_m > 0.0);
    }

    #[test]
    fn carried_packets_accrue_distance() {
        let net = line(2, 0.001);
        let mut pop = Population::new(vec![user(&net, 0, 0, &[1])], vec![packet(&net, 0, 0, 1)]);
        pop.pick_up(UserId(0), PacketId(0)).unwrap();
        let mut sim = placed(net, test_config(1, 1), pop);
        sim.movement_pass().unwrap();

        let (u, p) = (&sim.users()[0], &sim.packets()[0]);
        assert_eq!(u.carrying_distance_m, u.distance_m);
        assert_eq!(p.distance_m, u.distance_m);
        assert_eq!(p.pos, u.pos);
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    /// Observer that counts callbacks.
    #[derive(Default)]
    struct Counter {
        starts:   usize,
        ends:     usize,
        contacts: usize,
        summary:  bool,
        end:      Option<Cycle>,
    }
    impl SimObserver for Counter {
        fn on_cycle_start(&mut self, _c: Cycle) { self.starts += 1; }
        fn on_cycle_end(&mut self, _c: Cycle) { self.ends += 1; }
        fn on_contact(&mut self, _c: Cycle, a: UserId, b: UserId, _p: GeoPoint) {
            assert!(a < b);
            self.contacts += 1;
        }
        fn on_summary(&mut self, _s: &crate::RunSummary) { self.summary = true; }
        fn on_sim_end(&mut self, c: Cycle) { self.end = Some(c); }
    }

    #[test]
    fn run_cycles_advances_clock() {
        let mut sim = random_sim(MobilityKind::RandomWaypoint, 3);
        let mut obs = Counter::default();
        sim.run_cycles(5, &mut obs).unwrap();
        assert_eq!(sim.cycle(), Cycle(5));
        sim.run_cycles(3, &mut obs).unwrap();
        assert_eq!(sim.cycle(), Cycle(8));
        assert_eq!((obs.starts, obs.ends), (8, 8));
        assert!(!obs.summary);
    }

    #[test]
    fn run_until_stops_on_predicate() {
        let mut sim = random_sim(MobilityKind::RandomWaypoint, 4);
        let ran = sim.run_until(|s| s.cycle() == Cycle(12), &mut NoopObserver).unwrap();
        assert_eq!(ran, 12);
        assert_eq!(sim.cycle(), Cycle(12));
    }

    #[test]
    fn finish_reports_after_run_until() {
        let mut sim = random_sim(MobilityKind::RandomWaypoint, 4);
        let mut obs = Counter::default();
        sim.run_until(|s| s.cycle() == Cycle(7), &mut obs).unwrap();
        assert!(!obs.summary);
        assert_eq!(obs.end, None);

        let summary = sim.finish(&mut obs);
        assert!(obs.summary);
        assert_eq!(obs.end, Some(Cycle(7)));
        assert_eq!(summary.cycles, Cycle(7));
    }

    #[test]
    fn run_stops_at_max_cycles() {
        let config = SimConfig { max_cycles: 50, ..test_config(2, 3) };
        let mut sim = SimBuilder::new(config, grid(5, 5)).build().unwrap();
        let mut obs = Counter::default();
        let summary = sim.run(&mut obs).unwrap();
        assert!(summary.cycles <= Cycle(50));
        assert!(summary.undelivered == 0 || summary.cycles == Cycle(50));
        assert!(obs.summary);
        assert_eq!(obs.end, Some(summary.cycles));
    }

    #[test]
    fn packet_lifecycle_is_consistent() {
        let mut sim = random_sim(MobilityKind::RandomWaypoint, 5);
        let mut log = RecordLog::default();
        let summary = sim.run(&mut log).unwrap();

        assert!(!sim.delivered().is_empty());
        assert_eq!(summary.delivered + summary.undelivered, 5);
        for p in sim.packets() {
            let flying = sim.in_flight().contains(&p.id);
            let done = sim.delivered().contains(&p.id);
            assert!(flying != done, "{} in both or neither list", p.id);
            assert_eq!(done, p.is_delivered());

            let mine = |k: EventKind| log.records.iter().filter(|r| r.packet == p.id && r.kind == k).count();
            assert_eq!(mine(EventKind::Handover) as u32, p.handovers);
            assert_eq!(mine(EventKind::Delivery), usize::from(done));
            assert!(mine(EventKind::Pickup) <= 1);
            if done {
                assert_eq!(mine(EventKind::Pickup), 1);
            }
        }
        // Nothing happens to a packet after delivery.
        for r in &log.records {
            if let Some(at) = sim.packets()[r.packet.index()].delivered_at() {
                assert!(r.cycle <= at);
            }
        }
    }

    #[test]
    fn summary_matches_final_state() {
        let mut sim = random_sim(MobilityKind::ClusterWaypoint, 6);
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.packets.len(), 5);
        assert_eq!(summary.users.len(), 20);
        assert_eq!(summary.delivered, sim.delivered().len());
        assert!(summary.min_visits <= summary.max_visits);
        for (r, p) in summary.packets.iter().zip(sim.packets()) {
            assert_eq!(r.id, p.id);
            assert_eq!(r.delivered_at, p.delivered_at());
            assert!(r.shortest_m > 0.0, "cluster packets never start on their destination");
        }
        if summary.delivered == 0 {
            assert_eq!(summary.avg_handovers, None);
        } else {
            assert!(summary.avg_delivery_cycle.unwrap() < summary.cycles.0 as f64);
        }
        assert!(summary.avg_user_distance_m.unwrap() > 0.0);
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        for kind in [MobilityKind::RandomWaypoint, MobilityKind::ClusterWaypoint] {
            let (mut a, mut b) = (random_sim(kind, 7), random_sim(kind, 7));
            let (mut la, mut lb) = (RecordLog::default(), RecordLog::default());
            let sa = a.run(&mut la).unwrap();
            let sb = b.run(&mut lb).unwrap();
            assert_eq!(la.records, lb.records);
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn cluster_users_keep_known_clusters() {
        let mut sim = random_sim(MobilityKind::ClusterWaypoint, 8);
        sim.run_cycles(2_000, &mut NoopObserver).unwrap();
        let clusters = sim.clusters().unwrap();
        for u in sim.users() {
            assert!(!u.known_clusters.is_empty());
            assert!(u.known_clusters.iter().all(|n| clusters.nodes().contains(n)));
        }
    }
}

// ── Encounters ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod encounter_tests {
    use super::*;

    #[test]
    fn resting_pair_forms_one_growing_event() {
        let net = line(3, 0.001);
        let mut users = vec![user(&net, 0, 1, &[2]), user(&net, 1, 1, &[0])];
        users[0].wait_cooldown = 100;
        users[1].wait_cooldown = 100;
        let config = SimConfig { record_encounters: true, ..test_config(2, 1) };
        let pop = Population::new(users, vec![packet(&net, 0, 0, 2)]);
        let mut sim = placed(net, config, pop);
        sim.run_cycles(3, &mut NoopObserver).unwrap();

        let graph = sim.encounters().unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge_count(), 0);
        let (idx, ev) = graph.contact_events().next().unwrap();
        assert_eq!(ev.users, [UserId(0), UserId(1)]);
        assert_eq!((ev.start, ev.end), (Cycle(0), Cycle(3)));
        assert_eq!(graph.latest(UserId(0)), Some(idx));
    }

    #[test]
    fn new_partner_links_events() {
        // Users 0 and 1 rest together; user 2 walks in from the far end.
        let net = line(3, 0.00002);
        let mut users = vec![user(&net, 0, 0, &[1]), user(&net, 1, 0, &[1]), user(&net, 2, 2, &[2])];
        users[0].wait_cooldown = 100;
        users[1].wait_cooldown = 100;
        users[2].wait_cooldown = 3;
        let config = SimConfig { record_encounters: true, bluetooth_range_m: 3.0, ..test_config(3, 1) };
        let pop = Population::new(users, vec![packet(&net, 0, 1, 2)]);
        let mut sim = placed(net, config, pop);
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(sim.encounters().unwrap().len(), 1);

        // Walk user 2 next to the pair.
        sim.population.user_mut(UserId(2)).unwrap().pos = GeoPoint::new(0.0, 0.00001);
        sim.step(&mut NoopObserver).unwrap();
        let graph = sim.encounters().unwrap();
        assert!(graph.len() >= 2);
        assert!(graph.movement_edges().count() >= 1);
        assert!(graph.movement_edges().all(|(from, to, _)| from.index() < to.index()));
    }
}
