//! World index - owns every live actor and resource node
//!
//! Other services refer to actors by `ActorId` only. Ids are allocated
//! sequentially and stored in a `BTreeMap`, so iteration order (and with it
//! every decision that walks the actor list) is deterministic.

use std::collections::BTreeMap;

use crate::core::types::{ActorId, Faction, Vec3};
use crate::economy::{NodeId, ResourceKind, ResourceNode};
use crate::world::actor::{Actor, ActorKind, BuildingKind, UnitKind};

/// Which actors a query should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Any,
    Units,
    Structures,
    /// Units other than workers
    Military,
    Unit(UnitKind),
    Building(BuildingKind),
    Command,
}

impl KindFilter {
    pub fn matches(&self, kind: &ActorKind) -> bool {
        match (self, kind) {
            (KindFilter::Any, _) => true,
            (KindFilter::Units, ActorKind::Unit(_)) => true,
            (KindFilter::Structures, ActorKind::Building(_)) => true,
            (KindFilter::Military, ActorKind::Unit(unit)) => !unit.is_worker(),
            (KindFilter::Unit(wanted), ActorKind::Unit(unit)) => wanted == unit,
            (KindFilter::Building(wanted), ActorKind::Building(building)) => wanted == building,
            (KindFilter::Command, ActorKind::Building(building)) => building.is_command(),
            _ => false,
        }
    }
}

/// Read access to live actors
pub trait ActorQuery {
    fn actor(&self, id: ActorId) -> Option<&Actor>;

    /// Live actors of `faction` matching `filter`, optionally within `radius`
    /// of `from`. Results are ordered by id.
    fn find_actors(
        &self,
        faction: Faction,
        filter: KindFilter,
        radius: Option<f32>,
        from: Vec3,
    ) -> Vec<ActorId>;

    fn is_alive(&self, id: ActorId) -> bool {
        self.actor(id).is_some_and(|a| a.is_alive())
    }
}

/// Creates actors
pub trait ActorSpawner {
    fn spawn_actor(&mut self, kind: ActorKind, position: Vec3, yaw: f32, faction: Faction)
        -> ActorId;
}

/// Result of applying damage through the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    pub remaining_health: i32,
    /// Set when the hit destroyed the actor; it has already been removed
    pub destroyed: Option<Destroyed>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destroyed {
    pub faction: Faction,
    pub kind: ActorKind,
    /// The faction has no command structure left
    pub last_command_structure: bool,
}

/// The canonical set of live actors
#[derive(Debug, Clone, Default)]
pub struct World {
    actors: BTreeMap<ActorId, Actor>,
    nodes: Vec<ResourceNode>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    /// Number of live actors of `faction` matching `filter`
    pub fn count(&self, faction: Faction, filter: KindFilter) -> usize {
        self.actors
            .values()
            .filter(|a| a.faction == faction && filter.matches(&a.kind))
            .count()
    }

    pub fn count_units(&self, faction: Faction, kind: UnitKind) -> usize {
        self.count(faction, KindFilter::Unit(kind))
    }

    pub fn has_building(&self, faction: Faction, kind: BuildingKind) -> bool {
        self.count(faction, KindFilter::Building(kind)) > 0
    }

    /// The faction's first command structure, if it still has one
    pub fn command_structure(&self, faction: Faction) -> Option<ActorId> {
        self.actors
            .values()
            .find(|a| a.faction == faction && KindFilter::Command.matches(&a.kind))
            .map(|a| a.id)
    }

    /// Nearest live actor of `faction` matching `filter` to `from`
    pub fn nearest(
        &self,
        faction: Faction,
        filter: KindFilter,
        from: Vec3,
    ) -> Option<ActorId> {
        self.actors
            .values()
            .filter(|a| a.faction == faction && filter.matches(&a.kind))
            .min_by(|a, b| {
                a.position
                    .distance_squared(from)
                    .total_cmp(&b.position.distance_squared(from))
            })
            .map(|a| a.id)
    }

    /// Apply damage to an actor, removing it if its health reaches zero
    ///
    /// Returns `None` when the id no longer resolves.
    pub fn apply_damage(&mut self, id: ActorId, amount: i32) -> Option<DamageReport> {
        let actor = self.actors.get_mut(&id)?;
        let remaining_health = actor.take_damage(amount);
        if remaining_health > 0 {
            return Some(DamageReport {
                remaining_health,
                destroyed: None,
            });
        }

        let removed = self.despawn(id)?;
        let last_command_structure = matches!(removed.kind, ActorKind::Building(b) if b.is_command())
            && self.command_structure(removed.faction).is_none();

        Some(DamageReport {
            remaining_health: 0,
            destroyed: Some(Destroyed {
                faction: removed.faction,
                kind: removed.kind,
                last_command_structure,
            }),
        })
    }

    /// Remove an actor from the index and release any node it had claimed
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(&id)?;
        for node in self.nodes.iter_mut().filter(|n| n.claimed_by == Some(id)) {
            node.claimed_by = None;
        }
        Some(actor)
    }

    // === RESOURCE NODES ===

    pub fn add_resource_node(&mut self, resource: ResourceKind, position: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ResourceNode::new(id, resource, position));
        id
    }

    pub fn resource_nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Node currently claimed by `worker`
    pub fn claimed_node(&self, worker: ActorId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.claimed_by == Some(worker))
            .map(|n| n.id)
    }

    /// Nearest node nobody has claimed yet
    pub fn nearest_unclaimed_node(&self, from: Vec3) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|n| !n.is_claimed())
            .min_by(|a, b| {
                a.position
                    .distance_squared(from)
                    .total_cmp(&b.position.distance_squared(from))
            })
            .map(|n| n.id)
    }

    /// Claim a node for a worker; fails if someone else holds it
    pub fn claim_node(&mut self, id: NodeId, worker: ActorId) -> bool {
        match self.nodes.get_mut(id.0 as usize) {
            Some(node) if !node.is_claimed() => {
                node.claimed_by = Some(worker);
                true
            }
            _ => false,
        }
    }
}

impl ActorQuery for World {
    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    fn find_actors(
        &self,
        faction: Faction,
        filter: KindFilter,
        radius: Option<f32>,
        from: Vec3,
    ) -> Vec<ActorId> {
        self.actors
            .values()
            .filter(|a| a.is_alive() && a.faction == faction && filter.matches(&a.kind))
            .filter(|a| radius.map_or(true, |r| a.position.distance(from) <= r))
            .map(|a| a.id)
            .collect()
    }
}

impl ActorSpawner for World {
    fn spawn_actor(
        &mut self,
        kind: ActorKind,
        position: Vec3,
        yaw: f32,
        faction: Faction,
    ) -> ActorId {
        self.next_id += 1;
        let id = ActorId(self.next_id);
        self.actors
            .insert(id, Actor::new(id, kind, faction, position, yaw));
        id
    }
}
