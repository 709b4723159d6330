//! Per-level building tables: derived stats, upgrade costs and upgrade times

use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;
use crate::economy::Cost;
use crate::world::BuildingKind;

/// Highest level any upgradable building can reach
pub const MAX_LEVEL: u8 = 3;

/// Stats a building has at a given level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub max_health: i32,
    /// Resource units added to storage per production cycle
    pub production_rate: i64,
    /// Seconds per production cycle (0 for buildings that produce nothing)
    pub production_interval: Seconds,
    pub storage_capacity: i64,
}

/// Max level for a building kind; walls never upgrade
pub fn max_level(kind: BuildingKind) -> u8 {
    if kind.is_upgradable() {
        MAX_LEVEL
    } else {
        1
    }
}

/// Stats for `kind` at `level` (clamped to the valid range)
pub fn level_stats(kind: BuildingKind, level: u8) -> LevelStats {
    let level = level.clamp(1, max_level(kind));
    let health_scale = match level {
        1 => 1.0,
        2 => 1.5,
        _ => 2.0,
    };
    let max_health = (kind.base_health() as f32 * health_scale).round() as i32;

    if kind.produces().is_none() {
        return LevelStats {
            max_health,
            production_rate: 0,
            production_interval: 0.0,
            storage_capacity: 0,
        };
    }

    let (production_rate, production_interval, storage_capacity) = match level {
        1 => (10, 10.0, 100),
        2 => (15, 8.0, 200),
        _ => (22, 6.0, 400),
    };

    LevelStats {
        max_health,
        production_rate,
        production_interval,
        storage_capacity,
    }
}

/// Cost to upgrade from `level` to `level + 1`, or `None` at max level
pub fn upgrade_cost(kind: BuildingKind, level: u8) -> Option<Cost> {
    if level >= max_level(kind) {
        return None;
    }
    let base = match level {
        1 => Cost::new(100, 50, 0, 0),
        _ => Cost::new(200, 150, 50, 0),
    };
    let scale = if kind.is_command() { 2 } else { 1 };
    Some(Cost::new(
        base.wood * scale,
        base.stone * scale,
        base.iron * scale,
        base.food * scale,
    ))
}

/// Seconds needed to upgrade from `level` to `level + 1`
pub fn upgrade_time(kind: BuildingKind, level: u8) -> Seconds {
    let base = match level {
        1 => 30.0,
        _ => 60.0,
    };
    if kind.is_command() {
        base * 2.0
    } else {
        base
    }
}
