//! Damage formulas
//!
//! Units mitigate with defense. Structures have no defense stat and take a
//! flat fraction of the attacker's attack instead. Every hit deals at least 1.

use crate::world::Actor;

/// Damage an attacker deals to a unit
pub fn unit_damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(1)
}

/// Damage an attacker deals to a structure
pub fn structure_damage(attack: i32, factor: f32) -> i32 {
    ((attack as f32 * factor).round() as i32).max(1)
}

/// Damage `attacker` deals to `target`, picking the formula by target kind
pub fn damage_against(attacker: &Actor, target: &Actor, structure_factor: f32) -> i32 {
    if target.is_structure() {
        structure_damage(attacker.attack, structure_factor)
    } else {
        unit_damage(attacker.attack, target.defense)
    }
}
