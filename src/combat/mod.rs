//! Proximity combat - damage formulas and the per-actor resolver

pub mod damage;
pub mod resolver;

pub use damage::{damage_against, structure_damage, unit_damage};
pub use resolver::{attack_range_for, CombatIntent, CombatResolver, CombatState};
