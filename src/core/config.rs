//! Simulation configuration with documented constants
//!
//! All balancing numbers for combat, production and the enemy AI are collected
//! here. Every section has a `Default` so a TOML file only needs to name the
//! values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Seconds;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Combat tuning shared by every combat-capable actor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Seconds between automatic target scans
    pub scan_interval: Seconds,

    /// Seconds an attacker waits after striking before it can strike again
    pub attack_cooldown: Seconds,

    /// Attack range for melee units (workers, infantry, cavalry)
    pub melee_range: f32,

    /// Attack range for archers
    pub ranged_range: f32,

    /// Attack range for armed structures (towers, castles)
    pub structure_range: f32,

    /// Fraction of attack dealt to structures, which ignore defense
    ///
    /// At 0.8 an attack-15 unit takes 12 health per hit off a building.
    pub structure_damage_factor: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            scan_interval: 0.5,
            attack_cooldown: 2.0,
            melee_range: 4.0,
            ranged_range: 18.0,
            structure_range: 20.0,
            structure_damage_factor: 0.8,
        }
    }
}

/// Unit production tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Distance in front of a building where trained units appear
    pub spawn_offset: f32,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self { spawn_offset: 3.0 }
    }
}

/// Enemy AI tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds between decision ticks
    pub decision_interval: Seconds,

    /// Any resource below this sends the AI gathering
    pub min_resource_amount: i64,

    /// Fewer workers than this forces worker training above all else
    pub min_workers: usize,

    /// Military headcount the AI trains towards
    pub military_target: usize,

    /// Military headcount required before the AI attacks
    pub combat_threshold: usize,

    /// Per-kind caps used when picking the next military trainee
    pub infantry_cap: usize,
    pub archer_cap: usize,
    pub cavalry_cap: usize,

    /// Flat income per resource credited on each gathering tick
    pub gather_income: i64,

    /// Patrol destinations are drawn within this radius of the command structure
    pub patrol_radius: f32,

    /// Fraction of military units given a new patrol point each idle tick
    pub patrol_fraction: f64,

    /// Ring around the command structure where new buildings are placed
    pub build_offset_min: f32,
    pub build_offset_max: f32,

    /// Defensive structures the AI is willing to own
    pub max_towers: usize,
    pub max_walls: usize,

    /// Seed for the AI's placement and patrol randomness
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            decision_interval: 20.0,
            min_resource_amount: 200,
            min_workers: 3,
            military_target: 10,
            combat_threshold: 5,
            infantry_cap: 4,
            archer_cap: 3,
            cavalry_cap: 3,
            gather_income: 40,
            patrol_radius: 30.0,
            patrol_fraction: 0.5,
            build_offset_min: 12.0,
            build_offset_max: 28.0,
            max_towers: 2,
            max_walls: 2,
            seed: 42,
        }
    }
}

impl AiConfig {
    /// Copy with the values the AI samples from forced into usable ranges
    ///
    /// `patrol_fraction` is clamped to `0..=1`, inverted build offsets are
    /// swapped and non-finite values fall back to their defaults.
    pub fn clamped(&self) -> AiConfig {
        let defaults = AiConfig::default();
        let mut config = self.clone();

        config.patrol_fraction = if config.patrol_fraction.is_nan() {
            defaults.patrol_fraction
        } else {
            config.patrol_fraction.clamp(0.0, 1.0)
        };
        if !config.patrol_radius.is_finite() {
            config.patrol_radius = defaults.patrol_radius;
        }
        if !(config.build_offset_min.is_finite() && config.build_offset_max.is_finite()) {
            config.build_offset_min = defaults.build_offset_min;
            config.build_offset_max = defaults.build_offset_max;
        } else if config.build_offset_min > config.build_offset_max {
            std::mem::swap(&mut config.build_offset_min, &mut config.build_offset_max);
        }
        config
    }
}

/// Configuration for one match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub combat: CombatConfig,
    pub production: ProductionConfig,
    pub ai: AiConfig,
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combat.scan_interval <= 0.0 || self.combat.attack_cooldown <= 0.0 {
            return Err(ConfigError::Invalid(
                "combat intervals must be positive".into(),
            ));
        }

        if self.ai.decision_interval <= 0.0 {
            return Err(ConfigError::Invalid(
                "ai.decision_interval must be positive".into(),
            ));
        }

        if self.ai.build_offset_min > self.ai.build_offset_max {
            return Err(ConfigError::Invalid(format!(
                "ai.build_offset_min ({}) should be <= ai.build_offset_max ({})",
                self.ai.build_offset_min, self.ai.build_offset_max
            )));
        }

        if !(0.0..=1.0).contains(&self.ai.patrol_fraction) {
            return Err(ConfigError::Invalid(format!(
                "ai.patrol_fraction ({}) must be within 0..=1",
                self.ai.patrol_fraction
            )));
        }

        Ok(())
    }
}
