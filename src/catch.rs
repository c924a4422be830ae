//! Catch system data structures.
//!
//! Defines the rarity tiers, the per-bait rarity tables used for weighted
//! sampling, the species catalog entries, and the caught-fish record that
//! lives in a user's inventory.

use serde::{Deserialize, Serialize};

/// Rarity tiers for caught fish, determining score multiplier and sell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Rare = 1,
    Epic = 2,
}

impl Rarity {
    /// Score multiplier applied to the fish's weight.
    pub const fn multiplier(self) -> u64 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 5,
        }
    }

    /// Coins credited when a fish of this tier is caught and later sold.
    pub const fn sell_value(self) -> u64 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 3,
            Rarity::Epic => 6,
        }
    }

    /// Display name for messages and persisted records.
    pub const fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
        }
    }
}

/// Probability distribution over ordinary tiers for one bait, plus an
/// independent bonus-catch chance.
///
/// Tier order is the sampling order: cumulative sampling walks `tiers`
/// front to back, so declaration order is semantically significant. The
/// bonus chance is a separate field, never part of the cumulative sum.
#[derive(Debug, Clone, Copy)]
pub struct RarityTable {
    pub tiers: &'static [(Rarity, f64)],
    pub bonus_chance: f64,
}

impl RarityTable {
    /// Sum of the ordinary-tier probabilities.
    pub fn total_mass(&self) -> f64 {
        self.tiers.iter().map(|(_, p)| p).sum()
    }
}

/// One species that can be caught, with its sampling ranges.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesEntry {
    pub species: &'static str,
    pub glyph: &'static str,
    pub min_weight: f64,
    pub max_weight: f64,
    pub min_length: f64,
    pub max_length: f64,
}

/// A fish in a user's inventory. Immutable once caught; removed only by
/// the sell-all operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaughtFish {
    pub species: String,
    pub rarity: Rarity,
    pub glyph: String,
    /// Coins credited when sold.
    pub value: u64,
}
