//! Economy layer - resource counters and gatherable nodes

pub mod ledger;
pub mod resource_node;

pub use ledger::{Cost, LedgerError, ResourceAccess, ResourceKind, ResourceLedger};
pub use resource_node::{NodeId, ResourceNode};
