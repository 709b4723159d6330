//! Production and upgrade integration tests
//!
//! Training queues, upgrade timers and resource accrual driven through the
//! public `Simulation` API.

use skirmish::core::{ActorId, Faction, SimulationConfig, Vec3};
use skirmish::economy::{Cost, ResourceAccess, ResourceKind};
use skirmish::production::ProductionError;
use skirmish::simulation::SimEvent;
use skirmish::world::{ActorKind, ActorQuery, BuildingKind, UnitKind};
use skirmish::{SimError, Simulation};

fn sim_with_resources(amount: i64) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default());
    sim.ledger_mut(Faction::Player).credit_all(amount);
    sim
}

fn building(sim: &mut Simulation, kind: BuildingKind, yaw: f32) -> ActorId {
    sim.spawn(ActorKind::Building(kind), Faction::Player, Vec3::new(20.0, 0.0, 20.0), yaw)
}

fn trained(sim: &Simulation) -> Vec<(ActorId, Vec3)> {
    sim.events()
        .iter()
        .filter_map(|e| match e {
            SimEvent::UnitTrained { unit, position, .. } => Some((*unit, *position)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// TRAINING
// ============================================================================

#[test]
fn test_two_archers_one_job_two_spawns() {
    let mut sim = sim_with_resources(1000);
    let range = building(&mut sim, BuildingKind::ArcheryRange, 0.0);

    assert_eq!(sim.train_unit(range, UnitKind::Archer).unwrap(), 1);
    assert_eq!(sim.train_unit(range, UnitKind::Archer).unwrap(), 2);
    assert_eq!(sim.production().len(), 1);
    assert_eq!(sim.ledger(Faction::Player).get(ResourceKind::Wood), 920);

    // 25 s per archer
    for _ in 0..25 {
        sim.tick(1.0);
    }
    assert_eq!(trained(&sim).len(), 1);
    let job = sim.production().job(range).unwrap();
    assert_eq!(job.units_queued, 1);
    assert_eq!(job.elapsed_seconds, 0.0);

    for _ in 0..25 {
        sim.tick(1.0);
    }
    assert_eq!(trained(&sim).len(), 2);
    assert!(sim.production().job(range).is_none());
    assert_eq!(sim.world().count_units(Faction::Player, UnitKind::Archer), 2);
}

#[test]
fn test_trainees_appear_in_front_of_rotated_building() {
    let mut sim = sim_with_resources(1000);
    // Facing -Z
    let stable = building(&mut sim, BuildingKind::Stable, std::f32::consts::PI);
    sim.train_unit(stable, UnitKind::Cavalry).unwrap();

    for _ in 0..30 {
        sim.tick(1.0);
    }
    let spawned = trained(&sim);
    assert_eq!(spawned.len(), 1);
    let (unit, position) = spawned[0];
    assert!((position - Vec3::new(20.0, 0.0, 17.0)).length() < 1e-3);

    let actor = sim.world().actor(unit).unwrap();
    assert_eq!(actor.faction, Faction::Player);
    assert_eq!(actor.attack, UnitKind::Cavalry.stats().attack);
}

#[test]
fn test_unaffordable_training_is_rejected() {
    let mut sim = sim_with_resources(30);
    let barracks = building(&mut sim, BuildingKind::Barracks, 0.0);

    let err = sim.train_unit(barracks, UnitKind::Infantry).unwrap_err();
    assert!(matches!(err, SimError::Ledger(_)));
    assert!(sim.production().is_empty());
    assert_eq!(sim.ledger(Faction::Player).get(ResourceKind::Food), 30);
}

#[test]
fn test_unknown_building_is_rejected() {
    let mut sim = sim_with_resources(1000);
    let err = sim.train_unit(ActorId(99), UnitKind::Worker).unwrap_err();
    assert!(matches!(
        err,
        SimError::Production(ProductionError::UnknownBuilding(ActorId(99)))
    ));
}

#[test]
fn test_destroyed_building_keeps_job_without_refund() {
    let mut sim = sim_with_resources(1000);
    let barracks = building(&mut sim, BuildingKind::Barracks, 0.0);
    sim.train_unit(barracks, UnitKind::Infantry).unwrap();
    let after_payment = sim.ledger(Faction::Player).clone();

    sim.world_mut().despawn(barracks);
    for _ in 0..45 {
        sim.tick(1.0);
    }

    assert!(trained(&sim).is_empty());
    assert_eq!(sim.production().job(barracks).unwrap().units_queued, 1);
    assert_eq!(sim.ledger(Faction::Player), &after_payment);
    assert!(sim
        .events()
        .iter()
        .any(|e| matches!(e, SimEvent::TrainingStalled { .. })));
}

// ============================================================================
// UPGRADES
// ============================================================================

#[test]
fn test_upgrade_to_max_then_reject() {
    let mut sim = sim_with_resources(1000);
    let mill = building(&mut sim, BuildingKind::LumberMill, 0.0);

    assert_eq!(sim.start_upgrade(mill).unwrap(), 2);
    for _ in 0..30 {
        sim.tick(1.0);
    }
    assert_eq!(sim.upgrades().get(mill).unwrap().level(), 2);

    assert_eq!(sim.start_upgrade(mill).unwrap(), 3);
    for _ in 0..60 {
        sim.tick(1.0);
    }
    let entry = sim.upgrades().get(mill).unwrap();
    assert_eq!(entry.level(), 3);
    assert_eq!(sim.world().actor(mill).unwrap().max_health(), 1000);

    let before = sim.ledger(Faction::Player).clone();
    assert!(matches!(sim.start_upgrade(mill), Err(SimError::Upgrade(_))));
    assert_eq!(sim.ledger(Faction::Player), &before);
}

#[test]
fn test_cancel_mid_upgrade_restores_ledger() {
    let mut sim = sim_with_resources(1000);
    let castle = building(&mut sim, BuildingKind::Castle, 0.0);
    let before = sim.ledger(Faction::Player).clone();

    sim.start_upgrade(castle).unwrap();
    for _ in 0..15 {
        sim.tick(1.0);
    }
    let progress = sim.upgrades().get(castle).unwrap().upgrade_state().progress_fraction;
    assert!(progress > 0.0 && progress < 1.0);

    assert_eq!(sim.cancel_upgrade(castle).unwrap(), Cost::new(200, 100, 0, 0));
    assert_eq!(sim.ledger(Faction::Player), &before);
    let state = sim.upgrades().get(castle).unwrap().upgrade_state();
    assert!(!state.is_upgrading);
    assert_eq!(state.progress_fraction, 0.0);
}

// ============================================================================
// RESOURCE BUILDINGS
// ============================================================================

#[test]
fn test_quarry_accrues_and_collects() {
    let mut sim = sim_with_resources(0);
    let quarry = building(&mut sim, BuildingKind::Quarry, 0.0);

    for _ in 0..35 {
        sim.tick(1.0);
    }
    assert_eq!(sim.collect_resources(quarry).unwrap(), 30);
    assert_eq!(sim.ledger(Faction::Player).get(ResourceKind::Stone), 30);
    assert_eq!(sim.collect_resources(quarry).unwrap(), 0);
}

#[test]
fn test_upgrading_quarry_produces_nothing() {
    let mut sim = sim_with_resources(500);
    let quarry = building(&mut sim, BuildingKind::Quarry, 0.0);
    sim.start_upgrade(quarry).unwrap();

    for _ in 0..29 {
        sim.tick(1.0);
    }
    assert_eq!(
        sim.upgrades().get(quarry).unwrap().production_state().stored,
        0
    );
}
