//! Building levels, upgrade timers and resource production

pub mod levels;
pub mod upgrade;

pub use levels::{level_stats, max_level, upgrade_cost, upgrade_time, LevelStats, MAX_LEVEL};
pub use upgrade::{
    BuildingSnapshot, BuildingUpgradeTimer, ProductionState, UpgradableBuilding, UpgradeError,
    UpgradeState,
};
