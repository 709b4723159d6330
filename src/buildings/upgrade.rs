//! Building upgrades and resource production
//!
//! Each registered building carries an `UpgradeState` and a `ProductionState`.
//! Upgrades are paid up front, progress as a fraction of the level's upgrade
//! time and can be cancelled for a full refund. Resource buildings accrue
//! their output into local storage every production cycle, except while an
//! upgrade is running.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buildings::levels::{level_stats, max_level, upgrade_cost, upgrade_time, LevelStats};
use crate::core::types::{ActorId, Seconds};
use crate::economy::{Cost, LedgerError, ResourceAccess};
use crate::simulation::events::{EventLog, SimEvent};
use crate::world::{Actor, ActorQuery, BuildingKind, World};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpgradeError {
    #[error("Building {building} is already at max level {level}")]
    MaxLevel { building: ActorId, level: u8 },

    #[error("Building {0} is already upgrading")]
    AlreadyUpgrading(ActorId),

    #[error("Building {0} is not upgrading")]
    NotUpgrading(ActorId),

    #[error("Building {0} not registered")]
    UnknownBuilding(ActorId),

    #[error(transparent)]
    Insufficient(#[from] LedgerError),
}

/// Per-building leveling progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub current_level: u8,
    pub max_level: u8,
    pub is_upgrading: bool,
    /// 0.0 to 1.0; reset on completion and cancellation
    pub progress_fraction: f32,
    elapsed: Seconds,
    /// Amount debited at start, refunded verbatim on cancel
    paid: Option<Cost>,
}

impl UpgradeState {
    fn new(kind: BuildingKind) -> Self {
        Self {
            current_level: 1,
            max_level: max_level(kind),
            is_upgrading: false,
            progress_fraction: 0.0,
            elapsed: 0.0,
            paid: None,
        }
    }

    pub fn paid(&self) -> Option<Cost> {
        self.paid
    }

    fn reset(&mut self) {
        self.is_upgrading = false;
        self.progress_fraction = 0.0;
        self.elapsed = 0.0;
        self.paid = None;
    }
}

/// Stored output of a resource building
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionState {
    pub stored: i64,
    pub cycle_elapsed: Seconds,
}

/// Opaque per-building record for the save collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub building: ActorId,
    pub level: u8,
    pub stored: i64,
}

#[derive(Debug, Clone)]
pub struct UpgradableBuilding {
    pub building: ActorId,
    pub kind: BuildingKind,
    upgrade: UpgradeState,
    production: ProductionState,
    stats: LevelStats,
}

impl UpgradableBuilding {
    fn new(building: ActorId, kind: BuildingKind) -> Self {
        Self {
            building,
            kind,
            upgrade: UpgradeState::new(kind),
            production: ProductionState::default(),
            stats: level_stats(kind, 1),
        }
    }

    pub fn upgrade_state(&self) -> &UpgradeState {
        &self.upgrade
    }

    pub fn stats(&self) -> &LevelStats {
        &self.stats
    }

    pub fn production_state(&self) -> ProductionState {
        self.production
    }

    pub fn set_production_state(&mut self, state: ProductionState) {
        self.production = ProductionState {
            stored: state.stored.clamp(0, self.stats.storage_capacity),
            cycle_elapsed: state.cycle_elapsed.max(0.0),
        };
    }

    pub fn level(&self) -> u8 {
        self.upgrade.current_level
    }

    /// Move to `level`, recomputing derived stats; current health is kept
    fn apply_level(&mut self, level: u8, actor: Option<&mut Actor>) {
        self.upgrade.current_level = level;
        self.stats = level_stats(self.kind, level);
        self.production.stored = self.production.stored.min(self.stats.storage_capacity);
        if let Some(actor) = actor {
            actor.set_max_health(self.stats.max_health);
        }
    }

    /// Finish the running upgrade: next level, full health, timer reset
    fn complete(&mut self, actor: Option<&mut Actor>) -> u8 {
        let level = self.upgrade.current_level + 1;
        match actor {
            Some(actor) => {
                self.apply_level(level, Some(&mut *actor));
                actor.heal_full();
            }
            None => self.apply_level(level, None),
        }
        self.upgrade.reset();
        level
    }

    fn advance_production(&mut self, dt: Seconds) {
        if self.stats.production_interval <= 0.0 {
            return;
        }
        self.production.cycle_elapsed += dt;
        while self.production.cycle_elapsed >= self.stats.production_interval {
            self.production.cycle_elapsed -= self.stats.production_interval;
            // The cycle still elapses mid-upgrade; it just yields nothing
            if !self.upgrade.is_upgrading {
                self.production.stored = (self.production.stored + self.stats.production_rate)
                    .min(self.stats.storage_capacity);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildingUpgradeTimer {
    buildings: BTreeMap<ActorId, UpgradableBuilding>,
}

impl BuildingUpgradeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a building at level 1; non-buildings and repeats are ignored
    pub fn register(&mut self, actor: &Actor) -> bool {
        let Some(kind) = actor.kind.building() else {
            return false;
        };
        if self.buildings.contains_key(&actor.id) {
            return false;
        }
        self.buildings
            .insert(actor.id, UpgradableBuilding::new(actor.id, kind));
        true
    }

    pub fn get(&self, building: ActorId) -> Option<&UpgradableBuilding> {
        self.buildings.get(&building)
    }

    pub fn get_mut(&mut self, building: ActorId) -> Option<&mut UpgradableBuilding> {
        self.buildings.get_mut(&building)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Debit the next level's cost and start the timer
    ///
    /// Returns the level being upgraded to. Nothing is debited on failure.
    pub fn start_upgrade(
        &mut self,
        building: ActorId,
        ledger: &mut impl ResourceAccess,
    ) -> Result<u8, UpgradeError> {
        let entry = self
            .buildings
            .get_mut(&building)
            .ok_or(UpgradeError::UnknownBuilding(building))?;
        let state = &mut entry.upgrade;

        if state.current_level >= state.max_level {
            return Err(UpgradeError::MaxLevel {
                building,
                level: state.current_level,
            });
        }
        if state.is_upgrading {
            return Err(UpgradeError::AlreadyUpgrading(building));
        }
        let cost = upgrade_cost(entry.kind, state.current_level).ok_or(UpgradeError::MaxLevel {
            building,
            level: state.current_level,
        })?;

        ledger.try_spend(&cost)?;

        state.is_upgrading = true;
        state.progress_fraction = 0.0;
        state.elapsed = 0.0;
        state.paid = Some(cost);
        Ok(state.current_level + 1)
    }

    /// Stop the upgrade and refund exactly what was debited
    pub fn cancel_upgrade(
        &mut self,
        building: ActorId,
        ledger: &mut impl ResourceAccess,
    ) -> Result<Cost, UpgradeError> {
        let entry = self
            .buildings
            .get_mut(&building)
            .ok_or(UpgradeError::UnknownBuilding(building))?;
        if !entry.upgrade.is_upgrading {
            return Err(UpgradeError::NotUpgrading(building));
        }

        let refund = entry.upgrade.paid.unwrap_or_default();
        ledger.refund(&refund);
        entry.upgrade.reset();
        Ok(refund)
    }

    /// Finish a running upgrade immediately; returns the new level
    pub fn complete_now(&mut self, building: ActorId, world: &mut World) -> Result<u8, UpgradeError> {
        let entry = self
            .buildings
            .get_mut(&building)
            .ok_or(UpgradeError::UnknownBuilding(building))?;
        if !entry.upgrade.is_upgrading {
            return Err(UpgradeError::NotUpgrading(building));
        }

        let level = entry.complete(world.actor_mut(building));
        tracing::info!("{} {} reached level {}", entry.kind.name(), building, level);
        Ok(level)
    }

    /// Advance upgrade progress and resource production by `dt`
    pub fn tick(&mut self, world: &mut World, dt: Seconds, events: &mut EventLog) {
        self.buildings.retain(|id, _| world.is_alive(*id));

        for (id, entry) in self.buildings.iter_mut() {
            entry.advance_production(dt);

            if !entry.upgrade.is_upgrading {
                continue;
            }
            let duration = upgrade_time(entry.kind, entry.upgrade.current_level);
            entry.upgrade.elapsed += dt;
            entry.upgrade.progress_fraction = (entry.upgrade.elapsed / duration).min(1.0);
            if entry.upgrade.elapsed < duration {
                continue;
            }

            let level = entry.complete(world.actor_mut(*id));
            tracing::info!("{} {} reached level {}", entry.kind.name(), id, level);
            events.push(SimEvent::UpgradeCompleted {
                building: *id,
                level,
            });
        }
    }

    /// Move a resource building's stored output into `ledger`
    ///
    /// Returns the amount credited.
    pub fn collect(&mut self, building: ActorId, ledger: &mut impl ResourceAccess) -> i64 {
        let Some(entry) = self.buildings.get_mut(&building) else {
            return 0;
        };
        let Some(resource) = entry.kind.produces() else {
            return 0;
        };
        let amount = entry.production.stored;
        entry.production.stored = 0;
        ledger.add(resource, amount);
        amount
    }

    pub fn snapshot(&self) -> Vec<BuildingSnapshot> {
        self.buildings
            .values()
            .map(|b| BuildingSnapshot {
                building: b.building,
                level: b.upgrade.current_level,
                stored: b.production.stored,
            })
            .collect()
    }

    /// Apply saved levels and storage to already-registered buildings
    ///
    /// Health is not part of the record; actors keep the health they were
    /// recreated with, clamped to the restored level's maximum.
    pub fn restore(&mut self, snapshots: &[BuildingSnapshot], world: &mut World) {
        for snapshot in snapshots {
            let Some(entry) = self.buildings.get_mut(&snapshot.building) else {
                tracing::warn!("No registered building {} to restore", snapshot.building);
                continue;
            };
            let level = snapshot.level.clamp(1, entry.upgrade.max_level);
            entry.upgrade.reset();
            entry.apply_level(level, world.actor_mut(snapshot.building));
            entry.set_production_state(ProductionState {
                stored: snapshot.stored,
                cycle_elapsed: 0.0,
            });
        }
    }
}
