//! World layer - live actors, queries, and the collaborators the core talks to

pub mod actor;
pub mod index;
pub mod orders;
pub mod terrain;

pub use actor::{Actor, ActorKind, BuildingCategory, BuildingKind, UnitKind, UnitStats};
pub use index::{ActorQuery, ActorSpawner, DamageReport, Destroyed, KindFilter, World};
pub use orders::{Order, OrderLog, OrderSink};
pub use terrain::{BoundedTerrain, FlatTerrain, TerrainProbe};
