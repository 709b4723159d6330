//! Resource nodes - gatherable spots workers are sent to
//!
//! Nodes are not actors: they cannot be attacked and carry no health. A node
//! is claimed by at most one worker at a time.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Vec3};
use crate::economy::ledger::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: NodeId,
    pub resource: ResourceKind,
    pub position: Vec3,
    pub claimed_by: Option<ActorId>,
}

impl ResourceNode {
    pub fn new(id: NodeId, resource: ResourceKind, position: Vec3) -> Self {
        Self {
            id,
            resource,
            position,
            claimed_by: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}
