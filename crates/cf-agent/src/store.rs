//! `Population`: the users and packets of one run.
//!
//! # Why one struct?
//!
//! A packet's state names its carrier and the carrier's `carried` list names
//! the packet.  Keeping both sides behind the same `&mut self` methods means
//! the two can never disagree: every lifecycle method validates the packet
//! transition first, then patches the user lists.
//!
//! Ids are dense indices: `UserId(i)` is `users[i]`, `PacketId(i)` is
//! `packets[i]`.

use cf_core::{Cycle, GeoPoint, PacketId, UserId};

use crate::{AgentError, AgentResult, Packet, User};

pub struct Population {
    users:     Vec<User>,
    packets:   Vec<Packet>,
    /// Undelivered packets, ascending by id.
    in_flight: Vec<PacketId>,
    /// Delivered packets, in delivery order.
    delivered: Vec<PacketId>,
}

impl Population {
    /// Build from freshly spawned users and packets.
    ///
    /// Ids must equal positions in the vectors; every packet starts uncarried.
    pub fn new(users: Vec<User>, packets: Vec<Packet>) -> Self {
        debug_assert!(users.iter().enumerate().all(|(i, u)| u.id.index() == i));
        debug_assert!(packets.iter().enumerate().all(|(i, p)| p.id.index() == i));
        let in_flight = packets.iter().map(|p| p.id).collect();
        Self { users, packets, in_flight, delivered: Vec::new() }
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Iterator over all `UserId`s in ascending index order.
    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        (0..self.users.len() as u32).map(UserId)
    }

    pub fn user(&self, id: UserId) -> AgentResult<&User> {
        self.users.get(id.index()).ok_or(AgentError::UnknownUser(id))
    }

    pub fn user_mut(&mut self, id: UserId) -> AgentResult<&mut User> {
        self.users.get_mut(id.index()).ok_or(AgentError::UnknownUser(id))
    }

    pub fn packet(&self, id: PacketId) -> AgentResult<&Packet> {
        self.packets.get(id.index()).ok_or(AgentError::UnknownPacket(id))
    }

    /// Undelivered packets, ascending by id.
    pub fn in_flight(&self) -> &[PacketId] {
        &self.in_flight
    }

    /// Delivered packets, in delivery order.
    pub fn delivered(&self) -> &[PacketId] {
        &self.delivered
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// `user` picks up the uncarried `packet`, which moves to the user.
    pub fn pick_up(&mut self, user: UserId, packet: PacketId) -> AgentResult<()> {
        let pos = self.user(user)?.pos;
        let p = self.packets.get_mut(packet.index()).ok_or(AgentError::UnknownPacket(packet))?;
        p.pick_up(user)?;
        p.pos = pos;
        self.users[user.index()].carried.push(packet);
        Ok(())
    }

    /// Transfer `packet` from `from` to `to` and reposition it at `to`.
    pub fn hand_over(&mut self, packet: PacketId, from: UserId, to: UserId) -> AgentResult<()> {
        self.user(from)?;
        let pos = self.user(to)?.pos;
        let p = self.packets.get_mut(packet.index()).ok_or(AgentError::UnknownPacket(packet))?;
        p.hand_over(from, to)?;
        p.pos = pos;
        self.users[from.index()].carried.retain(|&c| c != packet);
        self.users[to.index()].carried.push(packet);
        Ok(())
    }

    /// Deliver `packet` during `cycle`.  Returns the former carrier.
    pub fn deliver(&mut self, packet: PacketId, cycle: Cycle) -> AgentResult<UserId> {
        let p = self.packets.get_mut(packet.index()).ok_or(AgentError::UnknownPacket(packet))?;
        let carrier = p.deliver(cycle)?;
        self.users[carrier.index()].carried.retain(|&c| c != packet);
        self.in_flight.retain(|&c| c != packet);
        self.delivered.push(packet);
        Ok(carrier)
    }

    // ── Movement bookkeeping ──────────────────────────────────────────────

    /// Move `user` to `pos`, crediting `step_m` metres to the user and to
    /// every packet it carries.
    pub fn relocate(&mut self, user: UserId, pos: GeoPoint, step_m: f64) -> AgentResult<()> {
        let u = self.users.get_mut(user.index()).ok_or(AgentError::UnknownUser(user))?;
        u.pos = pos;
        u.distance_m += step_m;
        if u.is_carrying() {
            u.carrying_distance_m += step_m;
        }
        for &pid in &u.carried {
            let p = &mut self.packets[pid.index()];
            p.pos = pos;
            p.distance_m += step_m;
        }
        Ok(())
    }
}
