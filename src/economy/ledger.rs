//! Resource ledger - per-faction resource counters

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four resources every faction tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Wood,
    Stone,
    Iron,
    Food,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Iron,
        ResourceKind::Food,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Iron => "iron",
            ResourceKind::Food => "food",
        }
    }

    fn index(&self) -> usize {
        match self {
            ResourceKind::Wood => 0,
            ResourceKind::Stone => 1,
            ResourceKind::Iron => 2,
            ResourceKind::Food => 3,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient {resource:?}: need {needed}, have {available}")]
    Insufficient {
        resource: ResourceKind,
        needed: i64,
        available: i64,
    },
}

/// A bundle of resource amounts (build costs, training packages, refunds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cost {
    pub wood: i64,
    pub stone: i64,
    pub iron: i64,
    pub food: i64,
}

impl Cost {
    pub const fn new(wood: i64, stone: i64, iron: i64, food: i64) -> Self {
        Self {
            wood,
            stone,
            iron,
            food,
        }
    }

    pub const fn free() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn amount(&self, resource: ResourceKind) -> i64 {
        match resource {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Iron => self.iron,
            ResourceKind::Food => self.food,
        }
    }

    /// Non-zero entries
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i64)> + '_ {
        ResourceKind::ALL
            .into_iter()
            .map(|r| (r, self.amount(r)))
            .filter(|(_, amount)| *amount != 0)
    }

    pub fn is_free(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Read/credit access to a faction's resources
///
/// `add` takes signed deltas and enforces no floor; callers check
/// affordability first.
pub trait ResourceAccess {
    fn get(&self, resource: ResourceKind) -> i64;
    fn add(&mut self, resource: ResourceKind, delta: i64);

    /// First resource the cost cannot be covered by, if any
    fn check(&self, cost: &Cost) -> Result<(), LedgerError> {
        for (resource, needed) in cost.iter() {
            let available = self.get(resource);
            if available < needed {
                return Err(LedgerError::Insufficient {
                    resource,
                    needed,
                    available,
                });
            }
        }
        Ok(())
    }

    fn can_afford(&self, cost: &Cost) -> bool {
        self.check(cost).is_ok()
    }

    /// Deduct a cost after checking affordability; nothing changes on failure
    fn try_spend(&mut self, cost: &Cost) -> Result<(), LedgerError> {
        self.check(cost)?;
        for (resource, amount) in cost.iter() {
            self.add(resource, -amount);
        }
        Ok(())
    }

    /// Credit a cost back unconditionally
    fn refund(&mut self, cost: &Cost) {
        for (resource, amount) in cost.iter() {
            self.add(resource, amount);
        }
    }
}

/// Four named resource counters owned by one faction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    amounts: [i64; 4],
}

impl ResourceLedger {
    pub const EMPTY: ResourceLedger = ResourceLedger { amounts: [0; 4] };

    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger starting with the given amounts
    pub fn with_amounts(wood: i64, stone: i64, iron: i64, food: i64) -> Self {
        Self {
            amounts: [wood, stone, iron, food],
        }
    }

    /// Smallest counter and which resource it is
    pub fn lowest(&self) -> (ResourceKind, i64) {
        ResourceKind::ALL
            .into_iter()
            .map(|r| (r, self.get(r)))
            .min_by_key(|(_, amount)| *amount)
            .unwrap_or((ResourceKind::Wood, 0))
    }

    pub fn credit_all(&mut self, amount: i64) {
        for resource in ResourceKind::ALL {
            self.add(resource, amount);
        }
    }
}

impl ResourceAccess for ResourceLedger {
    fn get(&self, resource: ResourceKind) -> i64 {
        self.amounts[resource.index()]
    }

    fn add(&mut self, resource: ResourceKind, delta: i64) {
        self.amounts[resource.index()] += delta;
    }
}
