//! AI decision engine - periodic state selection and the five handlers
//!
//! Every `decision_interval` seconds the engine takes a census of its faction,
//! picks one dominant state and runs exactly one handler. Handlers that are
//! missing something they need (command structure, free node, matching
//! building, ground under a build site) do nothing; the next decision tick
//! starts over from a fresh census.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::census::{decide, next_military_kind, FactionCensus, MILITARY_BUILDINGS};
use crate::ai::state::AiState;
use crate::buildings::BuildingUpgradeTimer;
use crate::combat::CombatResolver;
use crate::core::config::AiConfig;
use crate::core::types::{yaw_towards, ActorId, Faction, Seconds, Vec3};
use crate::economy::{ResourceAccess, ResourceKind, ResourceLedger};
use crate::production::ProductionQueue;
use crate::simulation::events::{EventLog, SimEvent};
use crate::world::{
    ActorKind, ActorQuery, ActorSpawner, BuildingKind, KindFilter, OrderSink, TerrainProbe,
    UnitKind, World,
};

const RESOURCE_BUILDINGS: [BuildingKind; 4] = [
    BuildingKind::LumberMill,
    BuildingKind::Quarry,
    BuildingKind::IronMine,
    BuildingKind::Farm,
];

/// Patrol escalation triggers when an enemy unit is this many patrol radii
/// from the command structure
const ALERT_RADIUS_FACTOR: f32 = 1.5;

/// Services an AI faction acts through during one decision tick
pub struct AiServices<'a> {
    pub world: &'a mut World,
    pub ledger: &'a mut ResourceLedger,
    pub production: &'a mut ProductionQueue,
    pub upgrades: &'a mut BuildingUpgradeTimer,
    pub combat: &'a mut CombatResolver,
    pub orders: &'a mut dyn OrderSink,
    pub terrain: &'a dyn TerrainProbe,
    pub events: &'a mut EventLog,
}

pub struct AiDecisionEngine {
    faction: Faction,
    config: AiConfig,
    state: AiState,
    since_decision: Seconds,
    /// Rotates which worker claims first when gathering
    gather_cursor: usize,
    rng: ChaCha8Rng,
}

impl AiDecisionEngine {
    /// The config goes through `AiConfig::clamped` first
    pub fn new(faction: Faction, config: AiConfig) -> Self {
        let config = config.clamped();
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            faction,
            // The first tick always decides
            since_decision: config.decision_interval,
            config,
            state: AiState::default(),
            gather_cursor: 0,
            rng,
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Advance the decision timer; decides when an interval has elapsed
    ///
    /// Returns the state chosen this tick, if a decision was made.
    pub fn tick(&mut self, dt: Seconds, services: &mut AiServices<'_>) -> Option<AiState> {
        self.since_decision += dt;
        if self.since_decision < self.config.decision_interval {
            return None;
        }
        self.since_decision -= self.config.decision_interval;
        Some(self.evaluate(services))
    }

    /// Take a census, pick the dominant state and run its handler now
    pub fn evaluate(&mut self, services: &mut AiServices<'_>) -> AiState {
        let census = FactionCensus::take(&*services.world, self.faction);
        let next = decide(&census, &*services.ledger, &self.config);
        tracing::debug!(
            "{} AI: {} workers, {} military, {} opposing units -> {}",
            self.faction.name(),
            census.workers,
            census.military(),
            census.opposing_units,
            next
        );
        self.transition(next, services.events);

        match next {
            AiState::Gathering => self.gather(services),
            AiState::Building => self.build(services),
            AiState::Training => self.train(&census, services),
            AiState::Combat => self.fight(services),
            AiState::Idle => self.idle(services),
        }

        self.state
    }

    fn transition(&mut self, to: AiState, events: &mut EventLog) {
        if self.state == to {
            return;
        }
        tracing::info!("{} AI: {} -> {}", self.faction.name(), self.state, to);
        events.push(SimEvent::AiStateChanged {
            faction: self.faction,
            from: self.state,
            to,
        });
        self.state = to;
    }

    // === GATHERING ===

    /// Send idle workers to the nearest free node and credit flat income
    fn gather(&mut self, services: &mut AiServices<'_>) {
        let mut workers = services.world.find_actors(
            self.faction,
            KindFilter::Unit(UnitKind::Worker),
            None,
            Vec3::ZERO,
        );

        if !workers.is_empty() {
            let start = self.gather_cursor % workers.len();
            workers.rotate_left(start);
            self.gather_cursor = self.gather_cursor.wrapping_add(1);
        }

        for worker in workers {
            if services.world.claimed_node(worker).is_some() {
                continue;
            }
            let Some(position) = services.world.actor(worker).map(|a| a.position) else {
                continue;
            };
            let Some(node) = services.world.nearest_unclaimed_node(position) else {
                tracing::debug!("{} AI: no free resource node for {}", self.faction.name(), worker);
                break;
            };
            if !services.world.claim_node(node, worker) {
                continue;
            }
            if let Some(destination) = services.world.node(node).map(|n| n.position) {
                services.orders.issue_move_order(worker, destination);
            }
        }

        for resource in ResourceKind::ALL {
            services.ledger.add(resource, self.config.gather_income);
        }
    }

    // === BUILDING ===

    /// Most needed structure: military first, then resource, then defensive
    fn next_structure(&self, world: &World) -> Option<BuildingKind> {
        let missing = |kind: BuildingKind| !world.has_building(self.faction, kind);

        MILITARY_BUILDINGS
            .iter()
            .find(|k| missing(**k))
            .or_else(|| RESOURCE_BUILDINGS.iter().find(|k| missing(**k)))
            .copied()
            .or_else(|| {
                let towers = world.count(self.faction, KindFilter::Building(BuildingKind::Tower));
                let walls = world.count(self.faction, KindFilter::Building(BuildingKind::Wall));
                if towers < self.config.max_towers {
                    Some(BuildingKind::Tower)
                } else if walls < self.config.max_walls {
                    Some(BuildingKind::Wall)
                } else {
                    None
                }
            })
    }

    /// Place the most needed structure on a random ring around the castle
    fn build(&mut self, services: &mut AiServices<'_>) {
        let Some(kind) = self.next_structure(services.world) else {
            return;
        };
        let Some(castle) = services
            .world
            .command_structure(self.faction)
            .and_then(|id| services.world.actor(id))
            .map(|a| a.position)
        else {
            tracing::debug!("{} AI: no command structure to build around", self.faction.name());
            return;
        };

        let cost = kind.build_cost();
        if !services.ledger.can_afford(&cost) {
            self.transition(AiState::Gathering, services.events);
            return;
        }

        let angle = self.rng.gen_range(0.0..TAU);
        let distance = self
            .rng
            .gen_range(self.config.build_offset_min..=self.config.build_offset_max);
        let x = castle.x + angle.sin() * distance;
        let z = castle.z + angle.cos() * distance;
        let Some(y) = services.terrain.ground_height(x, z) else {
            tracing::debug!("{} AI: no ground at ({x:.1}, {z:.1})", self.faction.name());
            return;
        };
        let position = Vec3::new(x, y, z);

        if services.ledger.try_spend(&cost).is_err() {
            return;
        }

        // Face the castle so trainees step out towards the base
        let yaw = yaw_towards(position, castle).unwrap_or(0.0);
        let building =
            services
                .world
                .spawn_actor(ActorKind::Building(kind), position, yaw, self.faction);
        if let Some(actor) = services.world.actor(building) {
            services.upgrades.register(actor);
        }

        tracing::info!("{} AI placed {} {} at {:?}", self.faction.name(), kind.name(), building, position);
        services.events.push(SimEvent::BuildingPlaced {
            building,
            faction: self.faction,
            kind,
            position,
        });
    }

    // === TRAINING ===

    /// Queue a worker when short of them, otherwise the next military kind
    fn train(&mut self, census: &FactionCensus, services: &mut AiServices<'_>) {
        let kind = if census.workers < self.config.min_workers {
            UnitKind::Worker
        } else {
            match next_military_kind(census, &self.config) {
                Some(kind) => kind,
                None => return,
            }
        };

        let Some(building) = services
            .world
            .find_actors(
                self.faction,
                KindFilter::Building(kind.trained_at()),
                None,
                Vec3::ZERO,
            )
            .into_iter()
            .find(|id| services.production.can_queue(*id, kind))
        else {
            tracing::debug!("{} AI: nowhere to train {}", self.faction.name(), kind.name());
            return;
        };

        let cost = kind.training_cost();
        if services.ledger.try_spend(&cost).is_err() {
            self.transition(AiState::Gathering, services.events);
            return;
        }

        match services
            .production
            .queue_training(building, kind, kind.training_seconds())
        {
            Ok(queued) => tracing::debug!(
                "{} AI queued {} at {} ({} waiting)",
                self.faction.name(),
                kind.name(),
                building,
                queued
            ),
            Err(err) => {
                tracing::debug!("{} AI: {err}", self.faction.name());
                services.ledger.refund(&cost);
            }
        }
    }

    // === COMBAT ===

    /// Target for one attacker: nearest enemy unit, else a random enemy structure
    fn pick_target(&mut self, world: &World, from: Vec3) -> Option<ActorId> {
        let opponent = self.faction.opponent();
        if let Some(unit) = world.nearest(opponent, KindFilter::Units, from) {
            return Some(unit);
        }
        world
            .find_actors(opponent, KindFilter::Structures, None, from)
            .choose(&mut self.rng)
            .copied()
    }

    /// Send every military unit at a target and lock it in
    fn fight(&mut self, services: &mut AiServices<'_>) {
        let attackers = services
            .world
            .find_actors(self.faction, KindFilter::Military, None, Vec3::ZERO);

        for attacker in attackers {
            let Some(from) = services.world.actor(attacker).map(|a| a.position) else {
                continue;
            };
            let Some(target) = self.pick_target(services.world, from) else {
                return;
            };
            let Some(destination) = services.world.actor(target).map(|a| a.position) else {
                continue;
            };

            services.orders.issue_move_order(attacker, destination);
            services.orders.issue_attack_order(attacker, target);
            services
                .combat
                .set_target(services.world, attacker, target, services.events);
        }
    }

    // === IDLE ===

    /// Patrol around the castle, or fight if an enemy unit comes close
    fn idle(&mut self, services: &mut AiServices<'_>) {
        let Some(castle) = services
            .world
            .command_structure(self.faction)
            .and_then(|id| services.world.actor(id))
            .map(|a| a.position)
        else {
            return;
        };

        let alert_radius = self.config.patrol_radius * ALERT_RADIUS_FACTOR;
        let intruders = services.world.find_actors(
            self.faction.opponent(),
            KindFilter::Units,
            Some(alert_radius),
            castle,
        );
        if !intruders.is_empty() {
            tracing::info!(
                "{} AI: {} enemy units near the castle",
                self.faction.name(),
                intruders.len()
            );
            self.transition(AiState::Combat, services.events);
            self.fight(services);
            return;
        }

        let patrollers = services
            .world
            .find_actors(self.faction, KindFilter::Military, None, Vec3::ZERO);
        for unit in patrollers {
            if !self.rng.gen_bool(self.config.patrol_fraction) {
                continue;
            }
            let angle = self.rng.gen_range(0.0..TAU);
            // sqrt keeps points uniform over the disc
            let distance = self.config.patrol_radius * self.rng.gen::<f32>().sqrt();
            let x = castle.x + angle.sin() * distance;
            let z = castle.z + angle.cos() * distance;
            let y = services.terrain.ground_height(x, z).unwrap_or(castle.y);
            services.orders.issue_move_order(unit, Vec3::new(x, y, z));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CombatConfig, ProductionConfig};
    use crate::world::{BoundedTerrain, FlatTerrain, Order, OrderLog};

    struct Fixture {
        world: World,
        ledger: ResourceLedger,
        production: ProductionQueue,
        upgrades: BuildingUpgradeTimer,
        combat: CombatResolver,
        orders: OrderLog,
        events: EventLog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: World::new(),
                ledger: ResourceLedger::with_amounts(2000, 2000, 2000, 2000),
                production: ProductionQueue::new(ProductionConfig::default()),
                upgrades: BuildingUpgradeTimer::new(),
                combat: CombatResolver::new(CombatConfig::default()),
                orders: OrderLog::new(),
                events: EventLog::new(),
            }
        }

        fn evaluate(&mut self, engine: &mut AiDecisionEngine, terrain: &dyn TerrainProbe) -> AiState {
            let mut services = AiServices {
                world: &mut self.world,
                ledger: &mut self.ledger,
                production: &mut self.production,
                upgrades: &mut self.upgrades,
                combat: &mut self.combat,
                orders: &mut self.orders,
                terrain,
                events: &mut self.events,
            };
            engine.evaluate(&mut services)
        }

        fn spawn(&mut self, kind: ActorKind, faction: Faction, x: f32, z: f32) -> ActorId {
            self.world
                .spawn_actor(kind, Vec3::new(x, 0.0, z), 0.0, faction)
        }

        fn units(&mut self, kind: UnitKind, faction: Faction, count: usize, x: f32) {
            for i in 0..count {
                self.spawn(ActorKind::Unit(kind), faction, x, i as f32 * 2.0);
            }
        }

        /// Enemy base with every military building
        fn base(&mut self) -> ActorId {
            let castle = self.spawn(ActorKind::Building(BuildingKind::Castle), Faction::Enemy, 0.0, 0.0);
            for (i, kind) in MILITARY_BUILDINGS.into_iter().enumerate() {
                self.spawn(ActorKind::Building(kind), Faction::Enemy, 15.0, i as f32 * 15.0);
            }
            castle
        }
    }

    fn engine() -> AiDecisionEngine {
        AiDecisionEngine::new(Faction::Enemy, AiConfig::default())
    }

    #[test]
    fn test_worker_shortage_trains_worker_at_castle() {
        let mut fx = Fixture::new();
        let castle = fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 2, -10.0);
        fx.units(UnitKind::Infantry, Faction::Enemy, 4, 5.0);
        fx.units(UnitKind::Archer, Faction::Enemy, 3, 6.0);
        fx.units(UnitKind::Cavalry, Faction::Enemy, 3, 7.0);
        fx.units(UnitKind::Infantry, Faction::Player, 3, 200.0);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Training);

        let job = fx.production.job(castle).expect("worker queued at castle");
        assert_eq!(job.unit_kind, UnitKind::Worker);
        assert_eq!(fx.ledger.get(ResourceKind::Food), 2000 - 50);
        assert!(fx.combat.target_of(ActorId(5)).is_none());
    }

    #[test]
    fn test_low_wood_selects_gathering() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.units(UnitKind::Infantry, Faction::Enemy, 4, 5.0);
        fx.ledger = ResourceLedger::with_amounts(100, 500, 500, 500);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Gathering);
        assert_eq!(fx.ledger.get(ResourceKind::Wood), 140);
        assert!(fx.events.iter().any(|e| matches!(
            e,
            SimEvent::AiStateChanged {
                to: AiState::Gathering,
                ..
            }
        )));
    }

    #[test]
    fn test_gathering_claims_distinct_nodes() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.world.add_resource_node(ResourceKind::Wood, Vec3::new(-20.0, 0.0, 0.0));
        fx.world.add_resource_node(ResourceKind::Stone, Vec3::new(-20.0, 0.0, 10.0));
        fx.ledger = ResourceLedger::new();

        let mut ai = engine();
        fx.evaluate(&mut ai, &FlatTerrain::new(0.0));

        let claimed = fx
            .world
            .resource_nodes()
            .iter()
            .filter(|n| n.is_claimed())
            .count();
        assert_eq!(claimed, 2);
        assert_eq!(fx.orders.len(), 2);
        assert!(fx
            .orders
            .orders()
            .iter()
            .all(|o| matches!(o, Order::MoveTo { .. })));

        // Claimed workers are not re-ordered
        fx.orders.drain();
        fx.evaluate(&mut ai, &FlatTerrain::new(0.0));
        assert!(fx.orders.is_empty());
    }

    #[test]
    fn test_building_places_missing_barracks() {
        let mut fx = Fixture::new();
        let castle = fx.spawn(ActorKind::Building(BuildingKind::Castle), Faction::Enemy, 0.0, 0.0);
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(2.5)), AiState::Building);

        let barracks = fx
            .world
            .find_actors(
                Faction::Enemy,
                KindFilter::Building(BuildingKind::Barracks),
                None,
                Vec3::ZERO,
            );
        assert_eq!(barracks.len(), 1);

        let placed = fx.world.actor(barracks[0]).unwrap();
        let castle_pos = fx.world.actor(castle).unwrap().position;
        let ring = Vec3::new(placed.position.x, 0.0, placed.position.z).distance(castle_pos);
        assert!((12.0 - 1e-3..=28.0 + 1e-3).contains(&ring));
        assert_eq!(placed.position.y, 2.5);
        assert!(fx.upgrades.get(barracks[0]).is_some());
        assert_eq!(fx.ledger.get(ResourceKind::Wood), 2000 - 150);
    }

    #[test]
    fn test_building_off_map_is_noop() {
        let mut fx = Fixture::new();
        fx.spawn(ActorKind::Building(BuildingKind::Castle), Faction::Enemy, 0.0, 0.0);
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);

        let mut ai = engine();
        let no_ground = BoundedTerrain::new(5.0, 0.0);
        assert_eq!(fx.evaluate(&mut ai, &no_ground), AiState::Building);
        assert!(!fx.world.has_building(Faction::Enemy, BuildingKind::Barracks));
        assert_eq!(fx.ledger.get(ResourceKind::Wood), 2000);
    }

    #[test]
    fn test_building_without_castle_is_noop() {
        let mut fx = Fixture::new();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Building);
        assert_eq!(fx.world.count(Faction::Enemy, KindFilter::Structures), 0);
        assert_eq!(fx.ledger, ResourceLedger::with_amounts(2000, 2000, 2000, 2000));
    }

    #[test]
    fn test_training_military_debits_package() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        let barracks = fx
            .world
            .find_actors(
                Faction::Enemy,
                KindFilter::Building(BuildingKind::Barracks),
                None,
                Vec3::ZERO,
            )[0];

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Training);
        assert_eq!(fx.production.job(barracks).unwrap().unit_kind, UnitKind::Infantry);
        assert_eq!(fx.ledger.get(ResourceKind::Iron), 2000 - 20);
    }

    #[test]
    fn test_training_unaffordable_falls_back_to_gathering() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 2, -10.0);
        fx.ledger = ResourceLedger::with_amounts(500, 500, 500, 10);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Gathering);
        assert!(fx.production.is_empty());
        assert_eq!(fx.ledger.get(ResourceKind::Food), 10);
    }

    #[test]
    fn test_combat_targets_nearest_enemy_unit() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.units(UnitKind::Infantry, Faction::Enemy, 4, 5.0);
        fx.units(UnitKind::Archer, Faction::Enemy, 3, 6.0);
        fx.units(UnitKind::Cavalry, Faction::Enemy, 3, 7.0);
        let near = fx.spawn(ActorKind::Unit(UnitKind::Infantry), Faction::Player, 60.0, 0.0);
        fx.spawn(ActorKind::Unit(UnitKind::Infantry), Faction::Player, 300.0, 0.0);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Combat);

        let military = fx
            .world
            .find_actors(Faction::Enemy, KindFilter::Military, None, Vec3::ZERO);
        assert_eq!(military.len(), 10);
        for unit in military {
            assert_eq!(fx.combat.target_of(unit), Some(near));
            assert_eq!(fx.orders.last_for(unit), Some(&Order::attack(unit, near)));
        }
    }

    #[test]
    fn test_idle_patrols_near_castle() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.units(UnitKind::Infantry, Faction::Enemy, 4, 5.0);
        fx.units(UnitKind::Archer, Faction::Enemy, 3, 6.0);
        fx.units(UnitKind::Cavalry, Faction::Enemy, 3, 7.0);

        let mut ai = engine();
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Idle);

        assert!(fx.orders.len() <= 10);
        for order in fx.orders.orders() {
            match order {
                Order::MoveTo { destination, .. } => assert!(destination.length() <= 30.0 + 1e-3),
                other => panic!("unexpected order {other:?}"),
            }
        }
    }

    #[test]
    fn test_out_of_range_config_still_patrols_and_builds() {
        let config = AiConfig {
            patrol_fraction: 1.5,
            build_offset_min: 40.0,
            build_offset_max: 10.0,
            ..AiConfig::default()
        };

        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.units(UnitKind::Infantry, Faction::Enemy, 4, 5.0);
        fx.units(UnitKind::Archer, Faction::Enemy, 3, 6.0);
        fx.units(UnitKind::Cavalry, Faction::Enemy, 3, 7.0);
        let mut ai = AiDecisionEngine::new(Faction::Enemy, config.clone());
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Idle);
        // Clamped to 1.0: every military unit patrols
        assert_eq!(fx.orders.len(), 10);

        let mut fx = Fixture::new();
        let castle = fx.spawn(ActorKind::Building(BuildingKind::Castle), Faction::Enemy, 0.0, 0.0);
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        let mut ai = AiDecisionEngine::new(Faction::Enemy, config);
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Building);

        let placed = fx
            .world
            .find_actors(
                Faction::Enemy,
                KindFilter::Building(BuildingKind::Barracks),
                None,
                Vec3::ZERO,
            );
        assert_eq!(placed.len(), 1);
        let ring = fx
            .world
            .actor(placed[0])
            .unwrap()
            .position
            .distance(fx.world.actor(castle).unwrap().position);
        assert!((10.0 - 1e-3..=40.0 + 1e-3).contains(&ring));
    }

    #[test]
    fn test_idle_escalates_when_enemy_near_castle() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.units(UnitKind::Infantry, Faction::Enemy, 4, 5.0);
        // Four military units is below the combat threshold, so the census alone idles
        let mut ai = AiDecisionEngine::new(
            Faction::Enemy,
            AiConfig {
                military_target: 4,
                ..AiConfig::default()
            },
        );
        let intruder = fx.spawn(ActorKind::Unit(UnitKind::Cavalry), Faction::Player, 0.0, 40.0);
        assert_eq!(fx.evaluate(&mut ai, &FlatTerrain::new(0.0)), AiState::Combat);

        let infantry = fx.world.find_actors(
            Faction::Enemy,
            KindFilter::Unit(UnitKind::Infantry),
            None,
            Vec3::ZERO,
        );
        assert!(infantry
            .iter()
            .all(|id| fx.combat.target_of(*id) == Some(intruder)));
    }

    #[test]
    fn test_tick_decides_on_interval() {
        let mut fx = Fixture::new();
        fx.base();
        fx.units(UnitKind::Worker, Faction::Enemy, 3, -10.0);
        fx.ledger = ResourceLedger::new();

        let mut ai = engine();
        let terrain = FlatTerrain::new(0.0);
        let mut decisions = 0;
        for _ in 0..40 {
            let mut services = AiServices {
                world: &mut fx.world,
                ledger: &mut fx.ledger,
                production: &mut fx.production,
                upgrades: &mut fx.upgrades,
                combat: &mut fx.combat,
                orders: &mut fx.orders,
                terrain: &terrain,
                events: &mut fx.events,
            };
            if ai.tick(1.0, &mut services).is_some() {
                decisions += 1;
            }
        }
        // t=1 (first tick), t=20 and t=40
        assert_eq!(decisions, 3);
        assert_eq!(fx.ledger.get(ResourceKind::Stone), 120);
    }
}
