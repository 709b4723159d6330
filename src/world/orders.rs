//! Move and attack intents handed to the host's pathfinding
//!
//! Orders are fire-and-forget: the core never learns whether a path exists.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Order {
    MoveTo { actor: ActorId, destination: Vec3 },
    Attack { actor: ActorId, target: ActorId },
}

impl Order {
    /// Convenience: create a move order
    pub fn move_to(actor: ActorId, destination: Vec3) -> Self {
        Order::MoveTo { actor, destination }
    }

    /// Convenience: create an attack order
    pub fn attack(actor: ActorId, target: ActorId) -> Self {
        Order::Attack { actor, target }
    }

    pub fn actor(&self) -> ActorId {
        match self {
            Order::MoveTo { actor, .. } | Order::Attack { actor, .. } => *actor,
        }
    }
}

/// Receives move/attack intents
pub trait OrderSink {
    fn issue_move_order(&mut self, actor: ActorId, destination: Vec3);
    fn issue_attack_order(&mut self, actor: ActorId, target: ActorId);
}

/// Buffers orders until the host drains them
#[derive(Debug, Clone, Default)]
pub struct OrderLog {
    orders: Vec<Order>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.orders)
    }

    /// Latest order issued to `actor`
    pub fn last_for(&self, actor: ActorId) -> Option<&Order> {
        self.orders.iter().rev().find(|o| o.actor() == actor)
    }
}

impl OrderSink for OrderLog {
    fn issue_move_order(&mut self, actor: ActorId, destination: Vec3) {
        self.orders.push(Order::move_to(actor, destination));
    }

    fn issue_attack_order(&mut self, actor: ActorId, target: ActorId) {
        self.orders.push(Order::attack(actor, target));
    }
}
