//! Simulation context - owns every service for one match
//!
//! Order of a tick: AI decisions, production, upgrades and resource
//! accrual, then combat. Everything runs on the caller's thread; services
//! reach each other only through the borrows handed out here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ai::{AiDecisionEngine, AiServices, AiState};
use crate::buildings::{BuildingSnapshot, BuildingUpgradeTimer};
use crate::combat::CombatResolver;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Faction, Seconds, Vec3};
use crate::economy::{Cost, ResourceAccess, ResourceLedger};
use crate::production::{ProductionError, ProductionQueue, TrainingJob};
use crate::simulation::events::{EventLog, SimEvent};
use crate::world::{
    Actor, ActorKind, ActorQuery, ActorSpawner, BuildingKind, FlatTerrain, Order, OrderLog,
    OrderSink, TerrainProbe, UnitKind, World,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[default]
    InProgress,
    Winner(Faction),
}

impl MatchOutcome {
    pub fn is_over(&self) -> bool {
        matches!(self, MatchOutcome::Winner(_))
    }

    pub fn winner(&self) -> Option<Faction> {
        match self {
            MatchOutcome::Winner(faction) => Some(*faction),
            MatchOutcome::InProgress => None,
        }
    }
}

/// Per-building records handed to the save collaborator verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub training_jobs: Vec<TrainingJob>,
    pub buildings: Vec<BuildingSnapshot>,
}

pub struct Simulation {
    config: SimulationConfig,
    world: World,
    ledgers: BTreeMap<Faction, ResourceLedger>,
    production: ProductionQueue,
    upgrades: BuildingUpgradeTimer,
    combat: CombatResolver,
    ai: Vec<AiDecisionEngine>,
    orders: OrderLog,
    terrain: Box<dyn TerrainProbe>,
    events: EventLog,
    outcome: MatchOutcome,
    elapsed: Seconds,
}

impl Simulation {
    /// New match on flat ground at height 0
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_terrain(config, Box::new(FlatTerrain::new(0.0)))
    }

    pub fn with_terrain(config: SimulationConfig, terrain: Box<dyn TerrainProbe>) -> Self {
        let ledgers = [Faction::Player, Faction::Enemy]
            .into_iter()
            .map(|f| (f, ResourceLedger::new()))
            .collect();

        Self {
            world: World::new(),
            ledgers,
            production: ProductionQueue::new(config.production.clone()),
            upgrades: BuildingUpgradeTimer::new(),
            combat: CombatResolver::new(config.combat.clone()),
            ai: Vec::new(),
            orders: OrderLog::new(),
            terrain,
            events: EventLog::new(),
            outcome: MatchOutcome::InProgress,
            elapsed: 0.0,
            config,
        }
    }

    /// Hand a faction to the AI; a second call for the same faction is ignored
    pub fn enable_ai(&mut self, faction: Faction) {
        if self.ai.iter().any(|engine| engine.faction() == faction) {
            return;
        }
        self.ai
            .push(AiDecisionEngine::new(faction, self.config.ai.clone()));
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn ledger(&self, faction: Faction) -> &ResourceLedger {
        static EMPTY: ResourceLedger = ResourceLedger::EMPTY;
        self.ledgers.get(&faction).unwrap_or(&EMPTY)
    }

    pub fn ledger_mut(&mut self, faction: Faction) -> &mut ResourceLedger {
        self.ledgers.entry(faction).or_default()
    }

    pub fn production(&self) -> &ProductionQueue {
        &self.production
    }

    pub fn upgrades(&self) -> &BuildingUpgradeTimer {
        &self.upgrades
    }

    pub fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.orders()
    }

    pub fn drain_orders(&mut self) -> Vec<Order> {
        self.orders.drain()
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    pub fn ai_state(&self, faction: Faction) -> Option<AiState> {
        self.ai
            .iter()
            .find(|engine| engine.faction() == faction)
            .map(|engine| engine.state())
    }

    // === SETUP ===

    /// Put an actor into the world at no cost; buildings start at level 1
    pub fn spawn(&mut self, kind: ActorKind, faction: Faction, position: Vec3, yaw: f32) -> ActorId {
        let id = self.world.spawn_actor(kind, position, yaw, faction);
        if let Some(actor) = self.world.actor(id) {
            self.upgrades.register(actor);
        }
        id
    }

    // === TICK ===

    /// Advance the whole match by `dt` seconds; a finished match stays frozen
    pub fn tick(&mut self, dt: Seconds) {
        if self.outcome.is_over() {
            return;
        }
        let mark = self.events.len();
        self.elapsed += dt;

        for engine in self.ai.iter_mut() {
            let Some(ledger) = self.ledgers.get_mut(&engine.faction()) else {
                continue;
            };
            let mut services = AiServices {
                world: &mut self.world,
                ledger,
                production: &mut self.production,
                upgrades: &mut self.upgrades,
                combat: &mut self.combat,
                orders: &mut self.orders,
                terrain: self.terrain.as_ref(),
                events: &mut self.events,
            };
            engine.tick(dt, &mut services);
        }

        self.production.tick(&mut self.world, dt, &mut self.events);
        self.upgrades.tick(&mut self.world, dt, &mut self.events);
        self.combat.tick_all(&mut self.world, dt, &mut self.events);

        let winner = self.events.events[mark..].iter().find_map(|e| match e {
            SimEvent::MatchEnded { winner } => Some(*winner),
            _ => None,
        });
        if let Some(winner) = winner {
            tracing::info!("Match over after {:.1}s: {} wins", self.elapsed, winner.name());
            self.outcome = MatchOutcome::Winner(winner);
        }
    }

    // === PLAYER ACTIONS ===

    fn ensure_running(&self) -> Result<()> {
        if self.outcome.is_over() {
            Err(SimError::MatchOver)
        } else {
            Ok(())
        }
    }

    fn find(&self, id: ActorId) -> Result<&Actor> {
        self.world.actor(id).ok_or(SimError::ActorNotFound(id))
    }

    /// Pay for and place a building, snapped to the ground under `position`
    pub fn place_building(
        &mut self,
        faction: Faction,
        kind: BuildingKind,
        position: Vec3,
        yaw: f32,
    ) -> Result<ActorId> {
        self.ensure_running()?;
        let y = self
            .terrain
            .ground_height(position.x, position.z)
            .ok_or_else(|| SimError::InvalidAction(format!("no ground under {position:?}")))?;

        let cost = kind.build_cost();
        self.ledger_mut(faction).try_spend(&cost)?;

        let position = Vec3::new(position.x, y, position.z);
        let building = self.spawn(ActorKind::Building(kind), faction, position, yaw);
        tracing::info!("{} placed {} {}", faction.name(), kind.name(), building);
        self.events.push(SimEvent::BuildingPlaced {
            building,
            faction,
            kind,
            position,
        });
        Ok(building)
    }

    /// Debit the training package and queue one unit at `building`
    ///
    /// Returns how many units are now queued there.
    pub fn train_unit(&mut self, building: ActorId, kind: UnitKind) -> Result<u32> {
        self.ensure_running()?;
        let actor = self
            .world
            .actor(building)
            .ok_or(ProductionError::UnknownBuilding(building))?;
        let faction = actor.faction;
        if actor.kind.building().and_then(|b| b.trains()) != Some(kind) {
            return Err(ProductionError::CannotTrain { building, kind }.into());
        }
        if let Some(job) = self.production.job(building) {
            if job.unit_kind != kind {
                return Err(ProductionError::QueueBusy {
                    building,
                    in_progress: job.unit_kind,
                    requested: kind,
                }
                .into());
            }
        }

        let cost = kind.training_cost();
        self.ledger_mut(faction).try_spend(&cost)?;

        match self
            .production
            .queue_training(building, kind, kind.training_seconds())
        {
            Ok(queued) => Ok(queued),
            Err(err) => {
                self.ledger_mut(faction).refund(&cost);
                Err(err.into())
            }
        }
    }

    /// Start upgrading a building; returns the level it is heading to
    pub fn start_upgrade(&mut self, building: ActorId) -> Result<u8> {
        self.ensure_running()?;
        let faction = self.find(building)?.faction;
        let ledger = self.ledgers.entry(faction).or_default();
        let target_level = self.upgrades.start_upgrade(building, ledger)?;
        self.events.push(SimEvent::UpgradeStarted {
            building,
            target_level,
        });
        Ok(target_level)
    }

    /// Cancel a running upgrade; returns the refunded amount
    pub fn cancel_upgrade(&mut self, building: ActorId) -> Result<Cost> {
        self.ensure_running()?;
        let faction = self.find(building)?.faction;
        let ledger = self.ledgers.entry(faction).or_default();
        let refund = self.upgrades.cancel_upgrade(building, ledger)?;
        let level = self.upgrades.get(building).map_or(1, |b| b.level());
        self.events.push(SimEvent::UpgradeCancelled { building, level });
        Ok(refund)
    }

    /// Finish a running upgrade immediately
    pub fn complete_upgrade_now(&mut self, building: ActorId) -> Result<u8> {
        self.ensure_running()?;
        let level = self.upgrades.complete_now(building, &mut self.world)?;
        self.events.push(SimEvent::UpgradeCompleted { building, level });
        Ok(level)
    }

    /// Move a resource building's storage into its owner's ledger
    pub fn collect_resources(&mut self, building: ActorId) -> Result<i64> {
        self.ensure_running()?;
        let faction = self.find(building)?.faction;
        let ledger = self.ledgers.entry(faction).or_default();
        let amount = self.upgrades.collect(building, ledger);
        if amount > 0 {
            self.events
                .push(SimEvent::ResourcesCollected { building, amount });
        }
        Ok(amount)
    }

    /// Send `actor` at `target` and lock it in as the combat target
    pub fn order_attack(&mut self, actor: ActorId, target: ActorId) -> Result<()> {
        self.ensure_running()?;
        let attacker = self.find(actor)?;
        let defender = self.find(target)?;
        if attacker.faction == defender.faction {
            return Err(SimError::InvalidAction(format!(
                "{actor} cannot attack its own side's {target}"
            )));
        }
        if !attacker.can_fight() {
            return Err(SimError::InvalidAction(format!("{actor} cannot fight")));
        }
        let destination = defender.position;
        let mobile = attacker.is_unit();

        if mobile {
            self.orders.issue_move_order(actor, destination);
        }
        self.orders.issue_attack_order(actor, target);
        self.combat
            .set_target(&mut self.world, actor, target, &mut self.events);
        Ok(())
    }

    /// Hand a move intent to the host's pathfinding
    pub fn order_move(&mut self, actor: ActorId, destination: Vec3) -> Result<()> {
        self.ensure_running()?;
        if !self.find(actor)?.is_unit() {
            return Err(SimError::InvalidAction(format!("{actor} cannot move")));
        }
        self.orders.issue_move_order(actor, destination);
        Ok(())
    }

    // === SAVE ===

    pub fn save_state(&self) -> SaveState {
        SaveState {
            training_jobs: self.production.snapshot(),
            buildings: self.upgrades.snapshot(),
        }
    }

    /// Restore per-building records onto buildings already in the world
    pub fn load_state(&mut self, state: SaveState) {
        self.production.restore(state.training_jobs);
        self.upgrades.restore(&state.buildings, &mut self.world);
    }
}
