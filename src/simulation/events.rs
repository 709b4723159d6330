//! Events emitted by the simulation core
//!
//! The host drains the log each frame to drive visuals, audio and UI.

use serde::{Deserialize, Serialize};

use crate::ai::AiState;
use crate::core::types::{ActorId, Faction, Vec3};
use crate::world::{ActorKind, BuildingKind, UnitKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Damage {
        attacker: ActorId,
        target: ActorId,
        amount: i32,
        remaining_health: i32,
    },
    ActorDestroyed {
        actor: ActorId,
        faction: Faction,
        kind: ActorKind,
    },
    UnitTrained {
        building: ActorId,
        unit: ActorId,
        kind: UnitKind,
        position: Vec3,
    },
    TrainingStalled {
        building: ActorId,
        kind: UnitKind,
    },
    BuildingPlaced {
        building: ActorId,
        faction: Faction,
        kind: BuildingKind,
        position: Vec3,
    },
    UpgradeStarted {
        building: ActorId,
        target_level: u8,
    },
    UpgradeCancelled {
        building: ActorId,
        level: u8,
    },
    UpgradeCompleted {
        building: ActorId,
        level: u8,
    },
    ResourcesCollected {
        building: ActorId,
        amount: i64,
    },
    AiStateChanged {
        faction: Faction,
        from: AiState,
        to: AiState,
    },
    MatchEnded {
        winner: Faction,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> + '_ {
        self.events.iter()
    }
}
