//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeSet;

use log::info;

use cf_agent::{Packet, Population, User};
use cf_contact::EncounterGraph;
use cf_core::{MobilityKind, NodeId, PacketId, SimConfig, SimRng, UserId};
use cf_mobility::{ClusterSet, MAX_PLAN_ATTEMPTS, Mobility, MobilityError};
use cf_spatial::{AStarRouter, ReachableStrategy, RoadNetwork, Router, SpatialError};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: counts, range, model, speed and seed
/// - [`RoadNetwork`]: with its reachable set already built
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                    |
/// |--------------------------|--------------------------------------------|
/// | `.router(r)`             | [`AStarRouter`]                            |
/// | `.reachable_strategy(s)` | keep the network's flood-fill set          |
/// | `.population(p)`         | users and packets spawned from the seed    |
///
/// # Draw order
///
/// One `SimRng` seeded from `config.seed` is consumed in a fixed order:
/// reachable-set probing (if requested), cluster selection, users in id
/// order, packets in id order, then the movement pass of every cycle.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network).build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router = AStarRouter> {
    config:     SimConfig,
    network:    RoadNetwork,
    router:     R,
    reachable:  Option<ReachableStrategy>,
    population: Option<Population>,
}

impl SimBuilder<AStarRouter> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, network: RoadNetwork) -> Self {
        Self {
            config,
            network,
            router:     AStarRouter,
            reachable:  None,
            population: None,
        }
    }
}

impl<R: Router> SimBuilder<R> {
    /// Route with `router` instead of A*.
    pub fn router<R2: Router>(self, router: R2) -> SimBuilder<R2> {
        SimBuilder {
            config:     self.config,
            network:    self.network,
            router,
            reachable:  self.reachable,
            population: self.population,
        }
    }

    /// Rebuild the network's reachable set with `strategy` before setup.
    pub fn reachable_strategy(mut self, strategy: ReachableStrategy) -> Self {
        self.reachable = Some(strategy);
        self
    }

    /// Use hand-placed users and packets instead of spawning them.
    ///
    /// Clusters are still selected for the cluster model; users keep
    /// whatever known clusters they were given.
    pub fn population(mut self, population: Population) -> Self {
        self.population = Some(population);
        self
    }

    /// Validate the configuration, select clusters, spawn users and packets,
    /// and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        let SimBuilder { config, mut network, router, reachable, population } = self;
        config.validate().map_err(SimError::from_core)?;

        let mut rng = SimRng::new(config.seed);
        if let Some(strategy) = reachable {
            network.build_reachable_set(strategy, &mut rng);
        }
        if network.reachable().is_empty() {
            return Err(SpatialError::EmptyReachableSet.into());
        }

        let mobility = match config.mobility {
            MobilityKind::RandomWaypoint => Mobility::RandomWaypoint,
            MobilityKind::ClusterWaypoint => match ClusterSet::select(&mut network, &mut rng) {
                Ok(set) => Mobility::ClusterWaypoint(set),
                Err(e @ MobilityError::TooFewClusterCandidates { .. }) => {
                    return Err(SimError::Config(e.to_string()));
                }
                Err(e) => return Err(e.into()),
            },
        };

        let population = match population {
            Some(p) => p,
            None => {
                let mut spawner = Spawner { network: &network, router: &router, rng: &mut rng };
                let (users, packets) = match mobility.clusters() {
                    None => spawner.random_waypoint(&config)?,
                    Some(clusters) => spawner.cluster_waypoint(&config, clusters)?,
                };
                Population::new(users, packets)
            }
        };

        info!(
            "sim ready: {} users, {} packets, {} model, {} reachable nodes, seed {}",
            population.user_count(),
            population.packet_count(),
            config.mobility,
            network.reachable().len(),
            config.seed
        );

        let encounters = config.record_encounters.then(EncounterGraph::new);
        Ok(Sim {
            clock: config.make_clock(),
            config,
            network,
            router,
            mobility,
            population,
            rng,
            encounters,
        })
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

struct Spawner<'a, R: Router> {
    network: &'a RoadNetwork,
    router:  &'a R,
    rng:     &'a mut SimRng,
}

impl<R: Router> Spawner<'_, R> {
    fn user(&self, i: usize, start: NodeId, path: Vec<NodeId>) -> SimResult<User> {
        let id = UserId::try_from(i).map_err(|_| SimError::Config(format!("user index {i} out of id range")))?;
        Ok(User::new(id, self.network.pos(start), path))
    }

    fn packet(&self, i: usize, origin: NodeId, destination: NodeId) -> SimResult<Packet> {
        let id = PacketId::try_from(i).map_err(|_| SimError::Config(format!("packet index {i} out of id range")))?;
        Ok(Packet::new(id, origin, self.network.pos(origin), destination, self.network.pos(destination)))
    }

    /// Route `from → to`; `None` when there is no route or `to == from`.
    fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        self.router
            .route(self.network, from, to)
            .ok()
            .filter(|r| !r.is_trivial())
            .map(|r| r.nodes)
    }

    fn random_waypoint(&mut self, config: &SimConfig) -> SimResult<(Vec<User>, Vec<Packet>)> {
        let mut users = Vec::with_capacity(config.users);
        for i in 0..config.users {
            let start = self.network.random_reachable_node(self.rng)?;
            let goal = self.network.random_reachable_node(self.rng)?;
            let path = self.path(start, goal).unwrap_or_else(|| vec![start]);
            users.push(self.user(i, start, path)?);
        }

        let mut packets = Vec::with_capacity(config.packets);
        for i in 0..config.packets {
            let origin = self.network.random_reachable_node(self.rng)?;
            let destination = self.network.random_reachable_node(self.rng)?;
            packets.push(self.packet(i, origin, destination)?);
        }
        Ok((users, packets))
    }

    fn cluster_waypoint(&mut self, config: &SimConfig, clusters: &ClusterSet) -> SimResult<(Vec<User>, Vec<Packet>)> {
        let no_clusters = || SimError::Config("cluster set has no positive weight".into());

        let mut users = Vec::with_capacity(config.users);
        for i in 0..config.users {
            let start = clusters.pick(self.rng).ok_or_else(no_clusters)?;
            let mut path = None;
            for _ in 0..MAX_PLAN_ATTEMPTS {
                let goal = clusters.pick(self.rng).ok_or_else(no_clusters)?;
                path = self.path(start, goal);
                if path.is_some() {
                    break;
                }
            }
            let path = path.unwrap_or_else(|| vec![start]);
            let known: BTreeSet<NodeId> = [Some(start), path.last().copied()].into_iter().flatten().collect();
            let mut user = self.user(i, start, path)?;
            user.known_clusters = known;
            users.push(user);
        }

        let mut packets = Vec::with_capacity(config.packets);
        for i in 0..config.packets {
            let origin = clusters.pick(self.rng).ok_or_else(no_clusters)?;
            let destination = clusters.pick_excluding(origin, self.rng).ok_or_else(no_clusters)?;
            packets.push(self.packet(i, origin, destination)?);
        }
        Ok((users, packets))
    }
}
