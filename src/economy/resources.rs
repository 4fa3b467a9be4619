//! Resource kinds and costs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of resource a wall can cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Wood,
    Stone,
    Iron,
    Gold,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Iron => "iron",
            ResourceKind::Gold => "gold",
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wood" => Ok(ResourceKind::Wood),
            "stone" => Ok(ResourceKind::Stone),
            "iron" => Ok(ResourceKind::Iron),
            "gold" => Ok(ResourceKind::Gold),
            other => Err(format!("unknown resource kind '{}'", other)),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bundle of resource amounts, kept sorted by kind
///
/// Deserializes from a TOML/JSON table such as `{ wood = 5, stone = 2 }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCost(BTreeMap<ResourceKind, u32>);

impl ResourceCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for adding one entry
    pub fn with(mut self, kind: ResourceKind, amount: u32) -> Self {
        *self.0.entry(kind).or_insert(0) += amount;
        self
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Cost of `count` units at this per-unit cost
    pub fn scaled(&self, count: u32) -> Self {
        Self(
            self.0
                .iter()
                .map(|(kind, amount)| (*kind, amount.saturating_mul(count)))
                .collect(),
        )
    }

    /// True when every entry is zero
    pub fn is_free(&self) -> bool {
        self.0.values().all(|amount| *amount == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.0.iter().map(|(kind, amount)| (*kind, *amount))
    }
}

impl FromIterator<(ResourceKind, u32)> for ResourceCost {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, u32)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ResourceCost::new(), |cost, (kind, amount)| cost.with(kind, amount))
    }
}

impl fmt::Display for ResourceCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_free() {
            return f.write_str("free");
        }
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(kind, amount)| format!("{} {}", amount, kind))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
