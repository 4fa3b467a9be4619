//! The building player's resource store
//!
//! Each kind sits in its own bin with a capacity. Wall costs are paid as a
//! whole `ResourceCost` or not at all.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::resources::{ResourceCost, ResourceKind};
use super::ResourceQuery;

/// Capacity a bin gets when it is first filled without one being set
const DEFAULT_CAPACITY: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Bin {
    amount: u32,
    capacity: u32,
}

impl Bin {
    fn with_capacity(capacity: u32) -> Self {
        Self {
            amount: 0,
            capacity,
        }
    }

    fn space(&self) -> u32 {
        self.capacity.saturating_sub(self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stockpile {
    bins: AHashMap<ResourceKind, Bin>,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize a bin; anything above the new capacity is lost
    pub fn set_capacity(&mut self, kind: ResourceKind, capacity: u32) {
        let bin = self.bins.entry(kind).or_insert(Bin::with_capacity(capacity));
        bin.capacity = capacity;
        bin.amount = bin.amount.min(capacity);
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.bins.get(&kind).map_or(0, |bin| bin.amount)
    }

    pub fn capacity(&self, kind: ResourceKind) -> u32 {
        self.bins.get(&kind).map_or(0, |bin| bin.capacity)
    }

    /// Store up to `amount`; returns how much fit
    pub fn deposit(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let bin = self
            .bins
            .entry(kind)
            .or_insert(Bin::with_capacity(DEFAULT_CAPACITY));
        let stored = amount.min(bin.space());
        bin.amount += stored;
        stored
    }

    /// Whether every entry of `cost` is in stock
    pub fn covers(&self, cost: &ResourceCost) -> bool {
        cost.iter().all(|(kind, amount)| self.amount(kind) >= amount)
    }

    /// Deduct all of `cost`, or nothing when any entry is short
    pub fn withdraw(&mut self, cost: &ResourceCost) -> bool {
        if !self.covers(cost) {
            return false;
        }
        for (kind, amount) in cost.iter() {
            if let Some(bin) = self.bins.get_mut(&kind) {
                bin.amount -= amount;
            }
        }
        true
    }
}

impl ResourceQuery for Stockpile {
    fn can_afford(&self, cost: &ResourceCost) -> bool {
        self.covers(cost)
    }

    fn spend(&mut self, cost: &ResourceCost) -> bool {
        self.withdraw(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wood_and_stone(wood: u32, stone: u32) -> ResourceCost {
        ResourceCost::new()
            .with(ResourceKind::Wood, wood)
            .with(ResourceKind::Stone, stone)
    }

    #[test]
    fn test_deposit_stops_at_capacity() {
        let mut stock = Stockpile::new();
        stock.set_capacity(ResourceKind::Wood, 50);

        assert_eq!(stock.deposit(ResourceKind::Wood, 30), 30);
        assert_eq!(stock.deposit(ResourceKind::Wood, 30), 20);
        assert_eq!(stock.amount(ResourceKind::Wood), 50);
    }

    #[test]
    fn test_first_deposit_gets_default_capacity() {
        let mut stock = Stockpile::new();
        stock.deposit(ResourceKind::Stone, 10);
        assert_eq!(stock.capacity(ResourceKind::Stone), DEFAULT_CAPACITY);
        assert_eq!(stock.capacity(ResourceKind::Gold), 0);
    }

    #[test]
    fn test_shrinking_capacity_clamps_amount() {
        let mut stock = Stockpile::new();
        stock.deposit(ResourceKind::Wood, 80);
        stock.set_capacity(ResourceKind::Wood, 40);
        assert_eq!(stock.amount(ResourceKind::Wood), 40);
    }

    #[test]
    fn test_withdraw_whole_cost() {
        let mut stock = Stockpile::new();
        stock.deposit(ResourceKind::Wood, 50);
        stock.deposit(ResourceKind::Stone, 30);

        let cost = wood_and_stone(20, 10);
        assert!(stock.can_afford(&cost));
        assert!(stock.spend(&cost));
        assert_eq!(stock.amount(ResourceKind::Wood), 30);
        assert_eq!(stock.amount(ResourceKind::Stone), 20);
    }

    #[test]
    fn test_short_entry_blocks_whole_withdrawal() {
        let mut stock = Stockpile::new();
        stock.deposit(ResourceKind::Wood, 50);

        let cost = wood_and_stone(20, 1);
        assert!(!stock.can_afford(&cost));
        assert!(!stock.spend(&cost));
        assert_eq!(stock.amount(ResourceKind::Wood), 50);
    }

    #[test]
    fn test_zero_entries_need_no_bin() {
        let mut stock = Stockpile::new();
        assert!(stock.can_afford(&ResourceCost::new()));
        assert!(stock.spend(&wood_and_stone(0, 0)));
    }
}
