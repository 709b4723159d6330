//! Combat resolver - periodic target scans and cooldown-gated attacks
//!
//! Each combat-capable actor carries an explicit `CombatState`: a scan timer,
//! an attack cooldown and the current intent. `tick` advances those timers by
//! the frame delta; nothing suspends.
//!
//! Intents come from two places. The automatic scan picks the nearest
//! opposing actor within range and drops its pick once nothing is in range.
//! An explicit intent (`set_target`) is kept while its target lives and has
//! not yet been within range, so a move-to-attack order survives the march.
//! Once the ordered target has been in range, a scan that finds it out of
//! range drops it like any other intent.

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::combat::damage::damage_against;
use crate::core::config::CombatConfig;
use crate::core::types::{yaw_towards, ActorId, Seconds};
use crate::simulation::events::{EventLog, SimEvent};
use crate::world::{Actor, ActorKind, ActorQuery, KindFilter, World};

/// Who an attacker is currently going after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatIntent {
    pub actor: ActorId,
    pub target: ActorId,
    pub is_target_structure: bool,
    /// Assigned through `set_target` rather than found by a scan
    pub explicit: bool,
    /// The target has been within attack range at least once
    pub engaged: bool,
}

/// Per-actor combat timers
#[derive(Debug, Clone)]
pub struct CombatState {
    pub attack_range: f32,
    pub attack_cooldown: Seconds,
    pub can_attack: bool,
    cooldown_remaining: Seconds,
    scan_elapsed: Seconds,
    pub intent: Option<CombatIntent>,
}

impl CombatState {
    fn new(attack_range: f32, config: &CombatConfig) -> Self {
        Self {
            attack_range,
            attack_cooldown: config.attack_cooldown,
            can_attack: true,
            cooldown_remaining: 0.0,
            // First tick scans immediately
            scan_elapsed: config.scan_interval,
            intent: None,
        }
    }

    pub fn cooldown_remaining(&self) -> Seconds {
        self.cooldown_remaining
    }

    fn advance_cooldown(&mut self, dt: Seconds) {
        if self.can_attack {
            return;
        }
        self.cooldown_remaining -= dt;
        if self.cooldown_remaining <= 0.0 {
            self.cooldown_remaining = 0.0;
            self.can_attack = true;
        }
    }

    fn start_cooldown(&mut self) {
        self.can_attack = false;
        self.cooldown_remaining = self.attack_cooldown;
    }
}

/// Attack range for an actor kind
pub fn attack_range_for(kind: &ActorKind, config: &CombatConfig) -> f32 {
    match kind {
        ActorKind::Unit(unit) if unit.is_ranged() => config.ranged_range,
        ActorKind::Unit(_) => config.melee_range,
        ActorKind::Building(_) => config.structure_range,
    }
}

/// Nearest live opposing actor within `range`; units win distance ties
fn scan_for_target(world: &World, attacker: &Actor, range: f32) -> Option<(ActorId, bool)> {
    world
        .find_actors(
            attacker.faction.opponent(),
            KindFilter::Any,
            Some(range),
            attacker.position,
        )
        .into_iter()
        .filter_map(|id| world.actor(id))
        .min_by_key(|target| {
            (
                OrderedFloat(target.position.distance(attacker.position)),
                target.is_structure(),
                target.id,
            )
        })
        .map(|target| (target.id, target.is_structure()))
}

fn in_range(world: &World, attacker: &Actor, target: ActorId, range: f32) -> bool {
    world
        .actor(target)
        .is_some_and(|t| t.position.distance(attacker.position) <= range)
}

#[derive(Debug, Clone)]
pub struct CombatResolver {
    config: CombatConfig,
    states: AHashMap<ActorId, CombatState>,
}

impl CombatResolver {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            states: AHashMap::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn state(&self, actor: ActorId) -> Option<&CombatState> {
        self.states.get(&actor)
    }

    pub fn target_of(&self, actor: ActorId) -> Option<ActorId> {
        self.states
            .get(&actor)
            .and_then(|s| s.intent)
            .map(|i| i.target)
    }

    pub fn can_attack(&self, actor: ActorId) -> bool {
        self.states.get(&actor).map_or(true, |s| s.can_attack)
    }

    fn attack_range(&self, actor: &Actor) -> f32 {
        self.states
            .get(&actor.id)
            .map_or_else(|| attack_range_for(&actor.kind, &self.config), |s| s.attack_range)
    }

    fn ensure_state(&mut self, actor: &Actor) -> &mut CombatState {
        let config = &self.config;
        self.states
            .entry(actor.id)
            .or_insert_with(|| CombatState::new(attack_range_for(&actor.kind, config), config))
    }

    /// Advance every combat-capable actor by `dt`
    pub fn tick_all(&mut self, world: &mut World, dt: Seconds, events: &mut EventLog) {
        self.states.retain(|id, _| world.is_alive(*id));
        for id in world.actor_ids() {
            self.tick(world, id, dt, events);
        }
    }

    /// Advance one actor: cooldown, target validity, periodic scan, attack
    pub fn tick(&mut self, world: &mut World, actor_id: ActorId, dt: Seconds, events: &mut EventLog) {
        let Some(actor) = world.actor(actor_id) else {
            self.states.remove(&actor_id);
            return;
        };
        if !actor.can_fight() {
            return;
        }

        let scan_interval = self.config.scan_interval;
        let state = self.ensure_state(actor);
        state.advance_cooldown(dt);

        if let Some(intent) = state.intent {
            if !world.is_alive(intent.target) {
                state.intent = None;
            }
        }

        state.scan_elapsed += dt;
        if state.scan_elapsed >= scan_interval {
            state.scan_elapsed = 0.0;
            let range = state.attack_range;
            let target_in_range = state
                .intent
                .is_some_and(|i| in_range(world, actor, i.target, range));
            if target_in_range {
                if let Some(intent) = state.intent.as_mut() {
                    intent.engaged = true;
                }
            }
            let keep_explicit = target_in_range && state.intent.is_some_and(|i| i.explicit);

            if !keep_explicit {
                match scan_for_target(world, actor, range) {
                    Some((target, is_structure)) => {
                        if state.intent.map(|i| i.target) != Some(target) {
                            state.intent = Some(CombatIntent {
                                actor: actor_id,
                                target,
                                is_target_structure: is_structure,
                                explicit: false,
                                engaged: true,
                            });
                        }
                    }
                    None => {
                        if state.intent.is_some_and(|i| !i.explicit || i.engaged) {
                            state.intent = None;
                        }
                    }
                }
            }
        }

        self.try_attack(world, actor_id, events);
    }

    /// Override the current target; attacks at once if the cooldown allows
    ///
    /// Returns false when either actor no longer resolves.
    pub fn set_target(
        &mut self,
        world: &mut World,
        actor_id: ActorId,
        target: ActorId,
        events: &mut EventLog,
    ) -> bool {
        let Some(actor) = world.actor(actor_id) else {
            return false;
        };
        let Some(target_actor) = world.actor(target) else {
            return false;
        };
        if !actor.can_fight() || target_actor.faction == actor.faction {
            return false;
        }

        let is_structure = target_actor.is_structure();
        let engaged = target_actor.position.distance(actor.position) <= self.attack_range(actor);
        let state = self.ensure_state(actor);
        state.intent = Some(CombatIntent {
            actor: actor_id,
            target,
            is_target_structure: is_structure,
            explicit: true,
            engaged,
        });

        self.try_attack(world, actor_id, events);
        true
    }

    /// Strike the current target if the attacker is ready and in range
    fn try_attack(&mut self, world: &mut World, actor_id: ActorId, events: &mut EventLog) {
        let structure_factor = self.config.structure_damage_factor;
        let Some(state) = self.states.get_mut(&actor_id) else {
            return;
        };
        let Some(intent) = state.intent else {
            return;
        };
        if !state.can_attack {
            return;
        }

        let (Some(attacker), Some(target)) = (world.actor(actor_id), world.actor(intent.target))
        else {
            state.intent = None;
            return;
        };
        if attacker.position.distance(target.position) > state.attack_range {
            return;
        }
        if let Some(intent) = state.intent.as_mut() {
            intent.engaged = true;
        }

        let damage = damage_against(attacker, target, structure_factor);
        let attacker_faction = attacker.faction;
        let target_position = target.position;

        if let Some(attacker) = world.actor_mut(actor_id) {
            if let Some(yaw) = yaw_towards(attacker.position, target_position) {
                attacker.yaw = yaw;
            }
        }

        state.start_cooldown();

        let Some(report) = world.apply_damage(intent.target, damage) else {
            state.intent = None;
            return;
        };

        events.push(SimEvent::Damage {
            attacker: actor_id,
            target: intent.target,
            amount: damage,
            remaining_health: report.remaining_health,
        });

        if let Some(destroyed) = report.destroyed {
            state.intent = None;
            tracing::debug!(
                "{} destroyed {} {}",
                actor_id,
                destroyed.kind.name(),
                intent.target
            );
            events.push(SimEvent::ActorDestroyed {
                actor: intent.target,
                faction: destroyed.faction,
                kind: destroyed.kind,
            });
            self.states.remove(&intent.target);

            if destroyed.last_command_structure {
                tracing::info!(
                    "{} lost its last command structure",
                    destroyed.faction.name()
                );
                events.push(SimEvent::MatchEnded {
                    winner: attacker_faction,
                });
            }
        }
    }
}
