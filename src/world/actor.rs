//! Actors - every unit or building that can take part in combat

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Faction, Seconds, Vec3};
use crate::economy::{Cost, ResourceKind};

/// Mobile unit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    Worker,
    Infantry,
    Archer,
    Cavalry,
}

/// Base combat stats assigned at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Worker,
        UnitKind::Infantry,
        UnitKind::Archer,
        UnitKind::Cavalry,
    ];

    /// Design constants; independent of how long the unit took to train
    pub fn stats(&self) -> UnitStats {
        let (health, attack, defense) = match self {
            UnitKind::Worker => (40, 4, 1),
            UnitKind::Infantry => (120, 15, 10),
            UnitKind::Archer => (80, 12, 4),
            UnitKind::Cavalry => (150, 18, 8),
        };
        UnitStats {
            health,
            attack,
            defense,
        }
    }

    pub fn training_seconds(&self) -> Seconds {
        match self {
            UnitKind::Worker => 10.0,
            UnitKind::Infantry => 20.0,
            UnitKind::Archer => 25.0,
            UnitKind::Cavalry => 30.0,
        }
    }

    /// Package cost debited when the unit is queued
    pub fn training_cost(&self) -> Cost {
        match self {
            UnitKind::Worker => Cost::new(0, 0, 0, 50),
            UnitKind::Infantry => Cost::new(20, 0, 20, 60),
            UnitKind::Archer => Cost::new(40, 0, 0, 50),
            UnitKind::Cavalry => Cost::new(0, 0, 40, 100),
        }
    }

    pub fn is_worker(&self) -> bool {
        matches!(self, UnitKind::Worker)
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, UnitKind::Archer)
    }

    /// The building kind that trains this unit
    pub fn trained_at(&self) -> BuildingKind {
        match self {
            UnitKind::Worker => BuildingKind::Castle,
            UnitKind::Infantry => BuildingKind::Barracks,
            UnitKind::Archer => BuildingKind::ArcheryRange,
            UnitKind::Cavalry => BuildingKind::Stable,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Worker => "worker",
            UnitKind::Infantry => "infantry",
            UnitKind::Archer => "archer",
            UnitKind::Cavalry => "cavalry",
        }
    }
}

/// What a building is for, used to order the AI's build priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingCategory {
    Command,
    Military,
    Resource,
    Defensive,
}

/// Structure types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingKind {
    Castle,
    Barracks,
    ArcheryRange,
    Stable,
    LumberMill,
    Quarry,
    IronMine,
    Farm,
    Wall,
    Tower,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 10] = [
        BuildingKind::Castle,
        BuildingKind::Barracks,
        BuildingKind::ArcheryRange,
        BuildingKind::Stable,
        BuildingKind::LumberMill,
        BuildingKind::Quarry,
        BuildingKind::IronMine,
        BuildingKind::Farm,
        BuildingKind::Wall,
        BuildingKind::Tower,
    ];

    pub fn category(&self) -> BuildingCategory {
        match self {
            BuildingKind::Castle => BuildingCategory::Command,
            BuildingKind::Barracks | BuildingKind::ArcheryRange | BuildingKind::Stable => {
                BuildingCategory::Military
            }
            BuildingKind::LumberMill
            | BuildingKind::Quarry
            | BuildingKind::IronMine
            | BuildingKind::Farm => BuildingCategory::Resource,
            BuildingKind::Wall | BuildingKind::Tower => BuildingCategory::Defensive,
        }
    }

    /// Losing the last of these ends the match for its faction
    pub fn is_command(&self) -> bool {
        matches!(self, BuildingKind::Castle)
    }

    /// Level-1 max health
    pub fn base_health(&self) -> i32 {
        match self {
            BuildingKind::Castle => 2000,
            BuildingKind::Barracks => 800,
            BuildingKind::ArcheryRange => 700,
            BuildingKind::Stable => 750,
            BuildingKind::LumberMill
            | BuildingKind::Quarry
            | BuildingKind::IronMine => 500,
            BuildingKind::Farm => 400,
            BuildingKind::Wall => 1200,
            BuildingKind::Tower => 600,
        }
    }

    /// Armed structures shoot back; everything else has zero attack
    pub fn base_attack(&self) -> i32 {
        match self {
            BuildingKind::Castle => 10,
            BuildingKind::Tower => 12,
            _ => 0,
        }
    }

    pub fn build_cost(&self) -> Cost {
        match self {
            BuildingKind::Castle => Cost::new(800, 800, 200, 0),
            BuildingKind::Barracks => Cost::new(150, 100, 0, 0),
            BuildingKind::ArcheryRange => Cost::new(200, 50, 0, 0),
            BuildingKind::Stable => Cost::new(150, 100, 50, 0),
            BuildingKind::LumberMill => Cost::new(100, 0, 0, 0),
            BuildingKind::Quarry => Cost::new(100, 0, 0, 0),
            BuildingKind::IronMine => Cost::new(100, 50, 0, 0),
            BuildingKind::Farm => Cost::new(80, 0, 0, 0),
            BuildingKind::Wall => Cost::new(0, 150, 0, 0),
            BuildingKind::Tower => Cost::new(50, 200, 50, 0),
        }
    }

    /// Unit kind this building trains
    pub fn trains(&self) -> Option<UnitKind> {
        match self {
            BuildingKind::Castle => Some(UnitKind::Worker),
            BuildingKind::Barracks => Some(UnitKind::Infantry),
            BuildingKind::ArcheryRange => Some(UnitKind::Archer),
            BuildingKind::Stable => Some(UnitKind::Cavalry),
            _ => None,
        }
    }

    /// Resource this building accrues into local storage
    pub fn produces(&self) -> Option<ResourceKind> {
        match self {
            BuildingKind::LumberMill => Some(ResourceKind::Wood),
            BuildingKind::Quarry => Some(ResourceKind::Stone),
            BuildingKind::IronMine => Some(ResourceKind::Iron),
            BuildingKind::Farm => Some(ResourceKind::Food),
            _ => None,
        }
    }

    pub fn is_upgradable(&self) -> bool {
        !matches!(self, BuildingKind::Wall)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::Castle => "castle",
            BuildingKind::Barracks => "barracks",
            BuildingKind::ArcheryRange => "archery_range",
            BuildingKind::Stable => "stable",
            BuildingKind::LumberMill => "lumber_mill",
            BuildingKind::Quarry => "quarry",
            BuildingKind::IronMine => "iron_mine",
            BuildingKind::Farm => "farm",
            BuildingKind::Wall => "wall",
            BuildingKind::Tower => "tower",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Unit(UnitKind),
    Building(BuildingKind),
}

impl ActorKind {
    pub fn is_unit(&self) -> bool {
        matches!(self, ActorKind::Unit(_))
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, ActorKind::Building(_))
    }

    pub fn unit(&self) -> Option<UnitKind> {
        match self {
            ActorKind::Unit(kind) => Some(*kind),
            ActorKind::Building(_) => None,
        }
    }

    pub fn building(&self) -> Option<BuildingKind> {
        match self {
            ActorKind::Building(kind) => Some(*kind),
            ActorKind::Unit(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActorKind::Unit(kind) => kind.name(),
            ActorKind::Building(kind) => kind.name(),
        }
    }
}

/// A live unit or building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub faction: Faction,
    pub kind: ActorKind,
    pub position: Vec3,
    /// Rotation about +Y in radians; see `forward_from_yaw`
    pub yaw: f32,
    health: i32,
    max_health: i32,
    pub attack: i32,
    /// Always 0 for structures
    pub defense: i32,
}

impl Actor {
    /// Build an actor with the base stats of its kind
    pub fn new(id: ActorId, kind: ActorKind, faction: Faction, position: Vec3, yaw: f32) -> Self {
        let (max_health, attack, defense) = match kind {
            ActorKind::Unit(unit) => {
                let stats = unit.stats();
                (stats.health, stats.attack, stats.defense)
            }
            ActorKind::Building(building) => (building.base_health(), building.base_attack(), 0),
        };

        Self {
            id,
            faction,
            kind,
            position,
            yaw,
            health: max_health,
            max_health,
            attack,
            defense,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_unit(&self) -> bool {
        self.kind.is_unit()
    }

    pub fn is_structure(&self) -> bool {
        self.kind.is_structure()
    }

    pub fn can_fight(&self) -> bool {
        self.attack > 0
    }

    /// Subtract damage, clamped so health never leaves `0..=max_health`
    ///
    /// Returns the remaining health.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.health = (self.health - amount.max(0)).clamp(0, self.max_health);
        self.health
    }

    pub fn heal_full(&mut self) {
        self.health = self.max_health;
    }

    /// Change max health, keeping current health within the new bound
    pub fn set_max_health(&mut self, max_health: i32) {
        self.max_health = max_health.max(1);
        self.health = self.health.min(self.max_health);
    }
}
