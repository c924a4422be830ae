//! Rod, bait, and species catalogs.
//!
//! Static game data: the rods that raise the hourly catch limit, the baits
//! that select a rarity table, and the species pools sampled per tier.
//! `validate_catalog` runs once at service startup and rejects malformed
//! data before any user state is touched.

use crate::catch::{Rarity, RarityTable, SpeciesEntry};
use crate::errors::ConfigError;

/// The rod every new account starts with. Never sold in the shop.
pub const DEFAULT_ROD: &str = "Basic Rod";

/// The free bait. Always usable, never decremented, never out of stock.
pub const DEFAULT_BAIT: &str = "Worm";

/// An equippable rod. Exactly one is equipped per user at a time.
#[derive(Debug, Clone, Copy)]
pub struct Rod {
    pub name: &'static str,
    pub price: u64,
    /// Additional catches per quota window on top of the base limit.
    pub quota_bonus: usize,
}

/// A purchasable bait and the rarity table it resolves against.
#[derive(Debug, Clone, Copy)]
pub struct Bait {
    pub name: &'static str,
    pub price: u64,
    pub table: RarityTable,
}

pub const RODS: [Rod; 5] = [
    Rod { name: "Basic Rod", price: 0, quota_bonus: 0 },
    Rod { name: "Sturdy Rod", price: 50, quota_bonus: 1 },
    Rod { name: "Lucky Rod", price: 75, quota_bonus: 1 },
    Rod { name: "Mystic Rod", price: 100, quota_bonus: 1 },
    Rod { name: "Golden Rod", price: 150, quota_bonus: 2 },
];

pub const BAITS: [Bait; 5] = [
    Bait {
        name: "Worm",
        price: 0,
        table: RarityTable {
            tiers: &[(Rarity::Common, 0.85), (Rarity::Rare, 0.15)],
            bonus_chance: 0.0,
        },
    },
    Bait {
        name: "Bread",
        price: 5,
        table: RarityTable {
            tiers: &[(Rarity::Common, 0.6), (Rarity::Rare, 0.3), (Rarity::Epic, 0.1)],
            bonus_chance: 0.0,
        },
    },
    Bait {
        name: "Insect",
        price: 8,
        table: RarityTable {
            tiers: &[(Rarity::Common, 0.4), (Rarity::Rare, 0.4), (Rarity::Epic, 0.2)],
            bonus_chance: 0.0,
        },
    },
    Bait {
        name: "Golden Bug",
        price: 15,
        table: RarityTable {
            tiers: &[(Rarity::Common, 0.2), (Rarity::Rare, 0.5), (Rarity::Epic, 0.3)],
            bonus_chance: 0.0,
        },
    },
    Bait {
        name: "Mystic Bait",
        price: 25,
        table: RarityTable {
            tiers: &[(Rarity::Common, 0.05), (Rarity::Rare, 0.45), (Rarity::Epic, 0.45)],
            bonus_chance: 0.05,
        },
    },
];

const COMMON_NORMAL: [SpeciesEntry; 1] = [SpeciesEntry {
    species: "Carp",
    glyph: "\u{1F41F}",
    min_weight: 1.0,
    max_weight: 3.0,
    min_length: 30.0,
    max_length: 50.0,
}];

const COMMON_BONUS: [SpeciesEntry; 0] = [];

const RARE_NORMAL: [SpeciesEntry; 1] = [SpeciesEntry {
    species: "Pike",
    glyph: "\u{1F408}",
    min_weight: 3.0,
    max_weight: 6.0,
    min_length: 50.0,
    max_length: 80.0,
}];

const RARE_BONUS: [SpeciesEntry; 1] = [SpeciesEntry {
    species: "Golden Eel",
    glyph: "\u{26A1}",
    min_weight: 4.0,
    max_weight: 6.0,
    min_length: 60.0,
    max_length: 70.0,
}];

const EPIC_NORMAL: [SpeciesEntry; 1] = [SpeciesEntry {
    species: "Jewel Fish",
    glyph: "\u{1F48E}",
    min_weight: 1.0,
    max_weight: 2.0,
    min_length: 20.0,
    max_length: 35.0,
}];

const EPIC_BONUS: [SpeciesEntry; 1] = [SpeciesEntry {
    species: "Leviathan",
    glyph: "\u{1F409}",
    min_weight: 10.0,
    max_weight: 15.0,
    min_length: 150.0,
    max_length: 200.0,
}];

/// All tiers, in sampling order.
pub const TIERS: [Rarity; 3] = [Rarity::Common, Rarity::Rare, Rarity::Epic];

/// Returns the species pool for a tier. The bonus pool may be empty;
/// callers fall back to the normal pool in that case.
pub fn species_pool(tier: Rarity, bonus: bool) -> &'static [SpeciesEntry] {
    match (tier, bonus) {
        (Rarity::Common, false) => &COMMON_NORMAL,
        (Rarity::Common, true) => &COMMON_BONUS,
        (Rarity::Rare, false) => &RARE_NORMAL,
        (Rarity::Rare, true) => &RARE_BONUS,
        (Rarity::Epic, false) => &EPIC_NORMAL,
        (Rarity::Epic, true) => &EPIC_BONUS,
    }
}

/// Looks up a rod by name.
pub fn find_rod(name: &str) -> Option<&'static Rod> {
    RODS.iter().find(|rod| rod.name == name)
}

/// Looks up a bait by name.
pub fn find_bait(name: &str) -> Option<&'static Bait> {
    BAITS.iter().find(|bait| bait.name == name)
}

/// Quota bonus for an equipped rod name. Unknown names grant no bonus, so
/// an account persisted with a rod that later left the catalog still loads.
pub fn rod_quota_bonus(name: &str) -> usize {
    find_rod(name).map_or(0, |rod| rod.quota_bonus)
}

/// Validates the full catalog. Called once at service startup; any error
/// is fatal and prevents the engine from serving actions.
pub fn validate_catalog() -> Result<(), ConfigError> {
    for bait in &BAITS {
        validate_table(bait.name, &bait.table)?;
    }
    for tier in TIERS {
        if species_pool(tier, false).is_empty() {
            return Err(ConfigError::EmptySpeciesPool {
                tier: tier.label().to_string(),
            });
        }
    }
    if find_rod(DEFAULT_ROD).is_none() {
        return Err(ConfigError::MissingDefault {
            kind: "rod",
            name: DEFAULT_ROD.to_string(),
        });
    }
    if find_bait(DEFAULT_BAIT).is_none() {
        return Err(ConfigError::MissingDefault {
            kind: "bait",
            name: DEFAULT_BAIT.to_string(),
        });
    }
    Ok(())
}

/// Probability sums are checked against a small epsilon so tables whose
/// declared values sum to 1 exactly in decimal are not rejected for binary
/// float drift.
const SUM_EPSILON: f64 = 1e-9;

fn validate_table(bait: &str, table: &RarityTable) -> Result<(), ConfigError> {
    for &(_, p) in table.tiers {
        if !(0.0..=1.0).contains(&p) || !p.is_finite() {
            return Err(ConfigError::BadTierProbability {
                bait: bait.to_string(),
                value: p,
            });
        }
    }
    let sum = table.total_mass();
    if sum <= 0.0 || sum > 1.0 + SUM_EPSILON {
        return Err(ConfigError::BadProbabilitySum {
            bait: bait.to_string(),
            sum,
        });
    }
    if !(0.0..=1.0).contains(&table.bonus_chance) || !table.bonus_chance.is_finite() {
        return Err(ConfigError::BadBonusChance {
            bait: bait.to_string(),
            value: table.bonus_chance,
        });
    }
    Ok(())
}
