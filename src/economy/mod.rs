//! Resource economy seen from the wall tool: costs and the ledger it asks

pub mod resources;
pub mod stockpile;

pub use resources::{ResourceCost, ResourceKind};
pub use stockpile::Stockpile;

/// Economy ledger consulted before walls are committed
pub trait ResourceQuery {
    /// Whether the full cost is currently available
    fn can_afford(&self, cost: &ResourceCost) -> bool;

    /// Deduct the cost; false (and nothing deducted) when it can't be paid
    fn spend(&mut self, cost: &ResourceCost) -> bool;
}

/// A ledger with bottomless pockets, for sandbox modes and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl ResourceQuery for Unlimited {
    fn can_afford(&self, _cost: &ResourceCost) -> bool {
        true
    }

    fn spend(&mut self, _cost: &ResourceCost) -> bool {
        true
    }
}
