//! Faction census and the prioritized decision rules
//!
//! `decide` is a pure function of a census, a ledger and the AI config, so
//! every rule can be checked without building a world.

use serde::{Deserialize, Serialize};

use crate::ai::state::AiState;
use crate::core::config::AiConfig;
use crate::core::types::{Faction, Vec3};
use crate::economy::{ResourceAccess, ResourceKind};
use crate::world::{ActorQuery, BuildingKind, KindFilter, UnitKind};

/// Military buildings the AI must own before it stops building
pub const MILITARY_BUILDINGS: [BuildingKind; 3] = [
    BuildingKind::Barracks,
    BuildingKind::ArcheryRange,
    BuildingKind::Stable,
];

/// Headcounts and holdings of one faction as seen at a decision tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactionCensus {
    pub workers: usize,
    pub infantry: usize,
    pub archers: usize,
    pub cavalry: usize,
    pub has_command_structure: bool,
    pub has_barracks: bool,
    pub has_archery_range: bool,
    pub has_stable: bool,
    /// Live mobile units of the opposing faction
    pub opposing_units: usize,
}

impl FactionCensus {
    /// Count a faction's actors through the world query collaborator
    pub fn take(world: &impl ActorQuery, faction: Faction) -> Self {
        let count = |faction: Faction, filter: KindFilter| {
            world.find_actors(faction, filter, None, Vec3::ZERO).len()
        };

        Self {
            workers: count(faction, KindFilter::Unit(UnitKind::Worker)),
            infantry: count(faction, KindFilter::Unit(UnitKind::Infantry)),
            archers: count(faction, KindFilter::Unit(UnitKind::Archer)),
            cavalry: count(faction, KindFilter::Unit(UnitKind::Cavalry)),
            has_command_structure: count(faction, KindFilter::Command) > 0,
            has_barracks: count(faction, KindFilter::Building(BuildingKind::Barracks)) > 0,
            has_archery_range: count(faction, KindFilter::Building(BuildingKind::ArcheryRange)) > 0,
            has_stable: count(faction, KindFilter::Building(BuildingKind::Stable)) > 0,
            opposing_units: count(faction.opponent(), KindFilter::Units),
        }
    }

    /// Non-worker units
    pub fn military(&self) -> usize {
        self.infantry + self.archers + self.cavalry
    }

    pub fn has_building(&self, kind: BuildingKind) -> bool {
        match kind {
            BuildingKind::Barracks => self.has_barracks,
            BuildingKind::ArcheryRange => self.has_archery_range,
            BuildingKind::Stable => self.has_stable,
            BuildingKind::Castle => self.has_command_structure,
            _ => false,
        }
    }

    pub fn missing_military_building(&self) -> Option<BuildingKind> {
        MILITARY_BUILDINGS
            .into_iter()
            .find(|kind| !self.has_building(*kind))
    }
}

/// Pick the single dominant state; the first matching rule wins
pub fn decide(census: &FactionCensus, ledger: &impl ResourceAccess, config: &AiConfig) -> AiState {
    if census.workers < config.min_workers {
        return AiState::Training;
    }

    if ResourceKind::ALL
        .into_iter()
        .any(|r| ledger.get(r) < config.min_resource_amount)
    {
        return AiState::Gathering;
    }

    if census.missing_military_building().is_some() {
        return AiState::Building;
    }

    if census.military() < config.military_target {
        return AiState::Training;
    }

    if census.opposing_units > 0 && census.military() >= config.combat_threshold {
        return AiState::Combat;
    }

    AiState::Idle
}

/// Next military trainee: infantry, then archers, then cavalry, each under its cap
pub fn next_military_kind(census: &FactionCensus, config: &AiConfig) -> Option<UnitKind> {
    if census.has_barracks && census.infantry < config.infantry_cap {
        Some(UnitKind::Infantry)
    } else if census.has_archery_range && census.archers < config.archer_cap {
        Some(UnitKind::Archer)
    } else if census.has_stable && census.cavalry < config.cavalry_cap {
        Some(UnitKind::Cavalry)
    } else {
        None
    }
}
