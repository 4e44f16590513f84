//! The `Sim` struct and its cycle loop.

use log::debug;

use cf_agent::{Packet, Population, User};
use cf_contact::EncounterGraph;
use cf_core::{Cycle, GeoPoint, NodeId, PacketId, SimClock, SimConfig, SimRng, UserId};
use cf_mobility::{Advance, ClusterSet, Mobility, advance, redirect};
use cf_spatial::{AStarRouter, RoadNetwork, Router};

use crate::summary::summarize;
use crate::{EventKind, LogRecord, RunSummary, SimObserver, SimResult};

/// Carrier angle used when the carrier's heading is undefined.
const UNDEFINED_CARRIER_ANGLE: f64 = std::f64::consts::PI;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<R>` holds all run state and drives the per-cycle passes:
///
/// 1. **Pickup**: users standing exactly on an uncarried packet take it;
///    users merely in range head for it.
/// 2. **Delivery**: carriers standing exactly on a packet's destination drop
///    it there; carriers merely in range head for it.
/// 3. **Negotiation**: in-range pairs are reported as contacts, then every
///    carrier offers its packets to in-range users whose heading points
///    more directly at the packet's destination.
/// 4. **Movement**: cooldowns tick down, otherwise users walk one step and
///    plan a new leg when their path runs out.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router = AStarRouter> {
    pub(crate) config:     SimConfig,
    pub(crate) clock:      SimClock,
    pub(crate) network:    RoadNetwork,
    pub(crate) router:     R,
    pub(crate) mobility:   Mobility,
    pub(crate) population: Population,
    pub(crate) rng:        SimRng,
    pub(crate) encounters: Option<EncounterGraph>,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until every packet is delivered or `config.max_cycles` is
    /// reached, then report the summary to `observer` and return it.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        while !self.population.in_flight().is_empty() && self.cycle().0 < self.config.max_cycles {
            self.step(observer)?;
        }
        Ok(self.finish(observer))
    }

    /// Report the summary and the end of the run to `observer`.
    ///
    /// [`run`][Self::run] calls this itself.  Drivers that stop through
    /// `step`, `run_cycles` or `run_until` call it once when they are done,
    /// so sinks get to flush and surface their errors.
    pub fn finish<O: SimObserver>(&self, observer: &mut O) -> RunSummary {
        let summary = self.summary();
        observer.on_summary(&summary);
        observer.on_sim_end(self.cycle());
        summary
    }

    /// Run exactly `n` cycles from the current position (ignores
    /// `max_cycles` and the in-flight count).
    pub fn run_cycles<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Step until `done` returns true, checked before every cycle, or until
    /// `max_cycles` is reached.  Returns the number of cycles executed.
    pub fn run_until<O, F>(&mut self, mut done: F, observer: &mut O) -> SimResult<u64>
    where
        O: SimObserver,
        F: FnMut(&Self) -> bool,
    {
        let start = self.cycle();
        while !done(self) && self.cycle().0 < self.config.max_cycles {
            self.step(observer)?;
        }
        Ok(self.cycle().since(start))
    }

    /// Execute one full cycle and advance the counter.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.cycle();
        observer.on_cycle_start(now);
        self.pickup_pass(now, observer)?;
        self.delivery_pass(now, observer)?;
        self.negotiation_pass(now, observer)?;
        self.movement_pass()?;
        observer.on_cycle_end(now);
        self.clock.advance();
        Ok(())
    }

    /// Statistics for the state reached so far.
    pub fn summary(&self) -> RunSummary {
        summarize(&self.network, &self.router, &self.population, self.cycle())
    }

    // ── Read-only state ───────────────────────────────────────────────────

    /// The cycle about to be executed.
    #[inline]
    pub fn cycle(&self) -> Cycle {
        self.clock.current
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn users(&self) -> &[User] {
        self.population.users()
    }

    pub fn packets(&self) -> &[Packet] {
        self.population.packets()
    }

    /// Undelivered packets, ascending by id.
    pub fn in_flight(&self) -> &[PacketId] {
        self.population.in_flight()
    }

    /// Delivered packets, in delivery order.
    pub fn delivered(&self) -> &[PacketId] {
        self.population.delivered()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn mobility(&self) -> &Mobility {
        &self.mobility
    }

    /// Cluster nodes, for the cluster-waypoint model.
    pub fn clusters(&self) -> Option<&ClusterSet> {
        self.mobility.clusters()
    }

    /// The encounter graph, if `record_encounters` is set.
    pub fn encounters(&self) -> Option<&EncounterGraph> {
        self.encounters.as_ref()
    }

    // ── Passes ────────────────────────────────────────────────────────────

    pub(crate) fn pickup_pass<O: SimObserver>(&mut self, now: Cycle, observer: &mut O) -> SimResult<()> {
        let range = self.config.bluetooth_range_m;
        let waiting: Vec<PacketId> = self
            .population
            .in_flight()
            .iter()
            .copied()
            .filter(|&p| self.population.packets()[p.index()].carrier().is_none())
            .collect();

        for pid in waiting {
            let (pos, target) = {
                let p = self.population.packet(pid)?;
                (p.pos, p.origin_node)
            };
            for uid in self.population.user_ids().collect::<Vec<_>>() {
                let user_pos = self.population.user(uid)?.pos;
                if user_pos.distance_m(pos) >= range {
                    continue;
                }
                if user_pos == pos {
                    self.population.pick_up(uid, pid)?;
                    debug!("{now}: {uid} picked up {pid} at {user_pos}");
                    observer.on_event(&LogRecord {
                        cycle: now,
                        kind: EventKind::Pickup,
                        user: uid,
                        counterpart: None,
                        packet: pid,
                        pos: user_pos,
                    });
                    break;
                }
                self.head_for(uid, target)?;
            }
        }
        Ok(())
    }

    pub(crate) fn delivery_pass<O: SimObserver>(&mut self, now: Cycle, observer: &mut O) -> SimResult<()> {
        let range = self.config.bluetooth_range_m;
        for uid in self.population.user_ids().collect::<Vec<_>>() {
            let carried = self.population.user(uid)?.carried.clone();
            for pid in carried {
                let user_pos = self.population.user(uid)?.pos;
                let (dest, dest_node) = {
                    let p = self.population.packet(pid)?;
                    (p.destination, p.destination_node)
                };
                if user_pos.distance_m(dest) >= range {
                    continue;
                }
                if user_pos == dest {
                    self.population.deliver(pid, now)?;
                    debug!("{now}: {uid} delivered {pid} at {user_pos}");
                    observer.on_event(&LogRecord {
                        cycle: now,
                        kind: EventKind::Delivery,
                        user: uid,
                        counterpart: None,
                        packet: pid,
                        pos: user_pos,
                    });
                } else {
                    self.head_for(uid, dest_node)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn negotiation_pass<O: SimObserver>(&mut self, now: Cycle, observer: &mut O) -> SimResult<()> {
        let range = self.config.bluetooth_range_m;
        let positions: Vec<GeoPoint> = self.population.users().iter().map(|u| u.pos).collect();

        // Users never move during this pass, so the neighbour lists hold for
        // all of it.  Each list is ascending by id.
        let mut near: Vec<Vec<usize>> = vec![Vec::new(); positions.len()];
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if positions[i].distance_m(positions[j]) < range {
                    near[i].push(j);
                    near[j].push(i);
                    let (a, b) = (UserId(i as u32), UserId(j as u32));
                    observer.on_contact(now, a, b, positions[i]);
                    if let Some(graph) = self.encounters.as_mut() {
                        graph.observe(a, b, positions[i], now);
                    }
                }
            }
        }

        let delay = self.config.trade_delay_cycles;
        for (i, others) in near.iter().enumerate() {
            let from = UserId(i as u32);
            for &j in others {
                let to = UserId(j as u32);
                if !(self.population.user(from)?.can_trade() && self.population.user(to)?.can_trade()) {
                    continue;
                }
                let offered = self.population.user(from)?.carried.clone();
                for pid in offered {
                    let dest = self.population.packet(pid)?.destination;
                    let carrier = self
                        .heading_angle(from, dest)?
                        .unwrap_or(UNDEFINED_CARRIER_ANGLE);
                    let Some(receiver) = self.heading_angle(to, dest)? else {
                        continue;
                    };
                    if receiver < carrier {
                        self.population.hand_over(pid, from, to)?;
                        self.population.user_mut(from)?.trade_cooldown = delay;
                        self.population.user_mut(to)?.trade_cooldown = delay;
                        debug!("{now}: {from} handed {pid} to {to} ({carrier:.3} → {receiver:.3} rad)");
                        observer.on_event(&LogRecord {
                            cycle: now,
                            kind: EventKind::Handover,
                            user: from,
                            counterpart: Some(to),
                            packet: pid,
                            pos: positions[i],
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn movement_pass(&mut self) -> SimResult<()> {
        let step_m = self.config.step_distance_m();
        for uid in self.population.user_ids().collect::<Vec<_>>() {
            let user = self.population.user_mut(uid)?;
            if user.trade_cooldown > 0 {
                user.trade_cooldown -= 1;
                continue;
            }
            if user.wait_cooldown > 0 {
                user.wait_cooldown -= 1;
                continue;
            }
            let Some(next) = user.next_node() else {
                continue;
            };
            let from = user.pos;

            match advance(from, self.network.pos(next), step_m) {
                Advance::EnRoute { pos, travelled_m } => {
                    self.population.relocate(uid, pos, travelled_m)?;
                }
                Advance::Arrived { travelled_m } => {
                    if travelled_m != 0.0 {
                        self.network.record_visit(next);
                    }
                    self.population.relocate(uid, self.network.pos(next), travelled_m)?;

                    let user = self.population.user_mut(uid)?;
                    user.path.pop_front();
                    if user.path.is_empty() {
                        let leg = self.mobility.plan_leg(
                            &self.network,
                            &self.router,
                            next,
                            &mut user.known_clusters,
                            &mut self.rng,
                        );
                        user.set_path(leg.path);
                        user.wait_cooldown = leg.wait;
                    }
                }
            }
        }
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Re-route `user` toward `target` unless its path already ends there.
    fn head_for(&mut self, user: UserId, target: NodeId) -> SimResult<()> {
        let u = self.population.user_mut(user)?;
        if u.final_node() == Some(target) {
            return Ok(());
        }
        let Some(next) = u.next_node() else {
            return Ok(());
        };
        u.set_path(redirect(&self.network, &self.router, next, target));
        Ok(())
    }

    /// Angle at `user` between its heading (toward the end of its path) and
    /// `target`.  `None` when the heading is undefined.
    fn heading_angle(&self, user: UserId, target: GeoPoint) -> SimResult<Option<f64>> {
        let u = self.population.user(user)?;
        Ok(u.final_node().and_then(|n| u.pos.heading_angle(self.network.pos(n), target)))
    }
}
