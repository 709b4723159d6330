//! Production queue - timed unit training per building
//!
//! One `TrainingJob` per building. The queue never touches resources: callers
//! check affordability and debit the training package before queueing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::ProductionConfig;
use crate::core::types::{forward_from_yaw, ActorId, Seconds, Vec3};
use crate::simulation::events::{EventLog, SimEvent};
use crate::world::{Actor, ActorKind, ActorQuery, ActorSpawner, UnitKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProductionError {
    #[error("Building {building} is already training {in_progress:?}, cannot queue {requested:?}")]
    QueueBusy {
        building: ActorId,
        in_progress: UnitKind,
        requested: UnitKind,
    },

    #[error("Building {0} not found")]
    UnknownBuilding(ActorId),

    #[error("Building {building} cannot train {kind:?}")]
    CannotTrain { building: ActorId, kind: UnitKind },

    #[error("Training time must be positive, got {0}")]
    InvalidDuration(Seconds),
}

/// Queued, timed request to produce units of one kind at one building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingJob {
    pub building: ActorId,
    pub unit_kind: UnitKind,
    pub seconds_required: Seconds,
    pub units_queued: u32,
    pub elapsed_seconds: Seconds,
}

impl TrainingJob {
    fn new(building: ActorId, unit_kind: UnitKind, seconds_required: Seconds) -> Self {
        Self {
            building,
            unit_kind,
            seconds_required,
            units_queued: 1,
            elapsed_seconds: 0.0,
        }
    }

    /// Progress of the unit currently in training (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        (self.elapsed_seconds / self.seconds_required).clamp(0.0, 1.0)
    }
}

/// Where a building's trainees appear: in front of it along its own forward axis
pub fn spawn_position(building: &Actor, offset: f32) -> Vec3 {
    building.position + forward_from_yaw(building.yaw) * offset
}

#[derive(Debug, Clone, Default)]
pub struct ProductionQueue {
    config: ProductionConfig,
    jobs: BTreeMap<ActorId, TrainingJob>,
}

impl ProductionQueue {
    pub fn new(config: ProductionConfig) -> Self {
        Self {
            config,
            jobs: BTreeMap::new(),
        }
    }

    pub fn job(&self, building: ActorId) -> Option<&TrainingJob> {
        self.jobs.get(&building)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &TrainingJob> + '_ {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Units of `kind` waiting across every building
    pub fn queued_units(&self, kind: UnitKind) -> u32 {
        self.jobs
            .values()
            .filter(|j| j.unit_kind == kind)
            .map(|j| j.units_queued)
            .sum()
    }

    /// Whether `building` would accept another `kind` trainee
    pub fn can_queue(&self, building: ActorId, kind: UnitKind) -> bool {
        self.jobs
            .get(&building)
            .map_or(true, |job| job.unit_kind == kind)
    }

    /// Enqueue one trainee; returns how many are now queued at the building
    pub fn queue_training(
        &mut self,
        building: ActorId,
        kind: UnitKind,
        seconds_per_unit: Seconds,
    ) -> Result<u32, ProductionError> {
        if seconds_per_unit <= 0.0 {
            return Err(ProductionError::InvalidDuration(seconds_per_unit));
        }

        match self.jobs.get_mut(&building) {
            Some(job) if job.unit_kind != kind => Err(ProductionError::QueueBusy {
                building,
                in_progress: job.unit_kind,
                requested: kind,
            }),
            Some(job) => {
                job.units_queued += 1;
                Ok(job.units_queued)
            }
            None => {
                self.jobs
                    .insert(building, TrainingJob::new(building, kind, seconds_per_unit));
                Ok(1)
            }
        }
    }

    /// Advance every job by `dt`, spawning units whose training completed
    ///
    /// A job whose building no longer resolves is kept and its timer restarts,
    /// so the trainee is retried on the next completion instead of vanishing.
    pub fn tick<W>(&mut self, world: &mut W, dt: Seconds, events: &mut EventLog) -> Vec<ActorId>
    where
        W: ActorQuery + ActorSpawner,
    {
        let mut spawned = Vec::new();
        let mut finished = Vec::new();

        for job in self.jobs.values_mut() {
            job.elapsed_seconds += dt;
            if job.elapsed_seconds < job.seconds_required {
                continue;
            }

            let Some(building) = world.actor(job.building) else {
                tracing::warn!(
                    "Building {} missing for {} trainee, retrying next cycle",
                    job.building,
                    job.unit_kind.name()
                );
                job.elapsed_seconds = 0.0;
                events.push(SimEvent::TrainingStalled {
                    building: job.building,
                    kind: job.unit_kind,
                });
                continue;
            };

            let position = spawn_position(building, self.config.spawn_offset);
            let yaw = building.yaw;
            let faction = building.faction;

            let unit = world.spawn_actor(ActorKind::Unit(job.unit_kind), position, yaw, faction);
            tracing::debug!(
                "{} trained {} {} at {:?}",
                job.building,
                job.unit_kind.name(),
                unit,
                position
            );
            events.push(SimEvent::UnitTrained {
                building: job.building,
                unit,
                kind: job.unit_kind,
                position,
            });
            spawned.push(unit);

            job.units_queued -= 1;
            job.elapsed_seconds = 0.0;
            if job.units_queued == 0 {
                finished.push(job.building);
            }
        }

        for building in finished {
            self.jobs.remove(&building);
        }

        spawned
    }

    /// Jobs to hand to the save collaborator
    pub fn snapshot(&self) -> Vec<TrainingJob> {
        self.jobs.values().cloned().collect()
    }

    /// Replace all jobs with a saved set; empty jobs are dropped
    pub fn restore(&mut self, jobs: Vec<TrainingJob>) {
        self.jobs = jobs
            .into_iter()
            .filter(|j| j.units_queued > 0)
            .map(|j| (j.building, j))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Faction;
    use crate::world::{BuildingKind, World};

    fn barracks(world: &mut World, yaw: f32) -> ActorId {
        world.spawn_actor(
            ActorKind::Building(BuildingKind::Barracks),
            Vec3::new(10.0, 0.0, 10.0),
            yaw,
            Faction::Enemy,
        )
    }

    fn trained(events: &EventLog) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SimEvent::UnitTrained { .. }))
            .count()
    }

    #[test]
    fn test_same_kind_merges_into_one_job() {
        let mut queue = ProductionQueue::default();
        let building = ActorId(1);

        assert_eq!(queue.queue_training(building, UnitKind::Infantry, 20.0), Ok(1));
        assert_eq!(queue.queue_training(building, UnitKind::Infantry, 20.0), Ok(2));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.job(building).unwrap().units_queued, 2);
    }

    #[test]
    fn test_different_kind_rejected() {
        let mut queue = ProductionQueue::default();
        let building = ActorId(1);
        queue.queue_training(building, UnitKind::Infantry, 20.0).unwrap();

        assert!(!queue.can_queue(building, UnitKind::Archer));
        assert_eq!(
            queue.queue_training(building, UnitKind::Archer, 25.0),
            Err(ProductionError::QueueBusy {
                building,
                in_progress: UnitKind::Infantry,
                requested: UnitKind::Archer
            })
        );
        assert_eq!(queue.job(building).unwrap().units_queued, 1);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut queue = ProductionQueue::default();
        assert!(matches!(
            queue.queue_training(ActorId(1), UnitKind::Worker, 0.0),
            Err(ProductionError::InvalidDuration(_))
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_completion_spawns_once_and_removes_job() {
        let mut world = World::new();
        let building = barracks(&mut world, 0.0);
        let mut queue = ProductionQueue::new(ProductionConfig::default());
        let mut events = EventLog::new();

        queue.queue_training(building, UnitKind::Infantry, 30.0).unwrap();

        for _ in 0..29 {
            queue.tick(&mut world, 1.0, &mut events);
        }
        assert_eq!(trained(&events), 0);
        assert!((queue.job(building).unwrap().elapsed_seconds - 29.0).abs() < 1e-4);

        let spawned = queue.tick(&mut world, 1.0, &mut events);
        assert_eq!(spawned.len(), 1);
        assert_eq!(trained(&events), 1);
        assert!(queue.job(building).is_none());

        let unit = world.actor(spawned[0]).unwrap();
        assert_eq!(unit.kind, ActorKind::Unit(UnitKind::Infantry));
        assert_eq!(unit.faction, Faction::Enemy);
        assert_eq!(unit.health(), UnitKind::Infantry.stats().health);
    }

    #[test]
    fn test_completion_resets_elapsed_when_more_queued() {
        let mut world = World::new();
        let building = barracks(&mut world, 0.0);
        let mut queue = ProductionQueue::new(ProductionConfig::default());
        let mut events = EventLog::new();

        queue.queue_training(building, UnitKind::Infantry, 30.0).unwrap();
        queue.queue_training(building, UnitKind::Infantry, 30.0).unwrap();

        for _ in 0..30 {
            queue.tick(&mut world, 1.0, &mut events);
        }
        let job = queue.job(building).unwrap();
        assert_eq!(trained(&events), 1);
        assert_eq!(job.units_queued, 1);
        assert_eq!(job.elapsed_seconds, 0.0);
    }

    #[test]
    fn test_spawn_uses_building_forward_axis() {
        let mut world = World::new();
        let facing_x = barracks(&mut world, std::f32::consts::FRAC_PI_2);
        let mut queue = ProductionQueue::new(ProductionConfig::default());
        let mut events = EventLog::new();

        queue.queue_training(facing_x, UnitKind::Worker, 1.0).unwrap();
        let spawned = queue.tick(&mut world, 1.0, &mut events);

        let pos = world.actor(spawned[0]).unwrap().position;
        assert!((pos - Vec3::new(13.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn test_missing_building_keeps_job() {
        let mut world = World::new();
        let building = barracks(&mut world, 0.0);
        let mut queue = ProductionQueue::new(ProductionConfig::default());
        let mut events = EventLog::new();

        queue.queue_training(building, UnitKind::Infantry, 5.0).unwrap();
        world.despawn(building);

        for _ in 0..5 {
            queue.tick(&mut world, 1.0, &mut events);
        }
        let job = queue.job(building).expect("job should be retained");
        assert_eq!(job.units_queued, 1);
        assert_eq!(job.elapsed_seconds, 0.0);
        assert_eq!(trained(&events), 0);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::TrainingStalled { .. })));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut queue = ProductionQueue::default();
        queue.queue_training(ActorId(3), UnitKind::Archer, 25.0).unwrap();
        queue.queue_training(ActorId(3), UnitKind::Archer, 25.0).unwrap();

        let saved = queue.snapshot();
        let json = serde_json::to_string(&saved).unwrap();
        let loaded: Vec<TrainingJob> = serde_json::from_str(&json).unwrap();

        let mut restored = ProductionQueue::default();
        restored.restore(loaded);
        assert_eq!(restored.job(ActorId(3)), queue.job(ActorId(3)));
        assert_eq!(restored.queued_units(UnitKind::Archer), 2);
    }
}
