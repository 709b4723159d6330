//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

pub use glam::Vec3;

/// Unique identifier for actors (units and buildings)
///
/// Allocated sequentially by the world index and never reused within a match,
/// so a stale id simply fails to resolve once its actor is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation time in seconds
pub type Seconds = f32;

/// Ownership tag used for all targeting and query filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// The faction this one fights against
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Faction::Player => "player",
            Faction::Enemy => "enemy",
        }
    }
}

/// Unit forward axis for a yaw angle (radians, rotation about +Y)
///
/// Yaw 0 faces +Z.
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw that makes something at `from` face `to` on the ground plane
///
/// Returns `None` when the two points coincide horizontally.
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx.abs() < 1e-4 && dz.abs() < 1e-4 {
        None
    } else {
        Some(dx.atan2(dz))
    }
}
