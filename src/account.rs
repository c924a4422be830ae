//! Durable per-user account state.

use crate::catch::CaughtFish;
use crate::constants::{BASE_CATCH_LIMIT, STARTING_COINS};
use crate::tackle::{rod_quota_bonus, DEFAULT_ROD};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user's economy and inventory state.
///
/// Created on first interaction and mutated by every economy operation;
/// never destroyed. Score is monotonic, coins never go negative (both by
/// unsigned type and by checked debits in the economy operations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Stable external identity supplied by the transport layer.
    pub user_id: String,
    pub display_name: String,
    pub score: u64,
    pub coins: u64,
    /// Name of the equipped rod. Exactly one rod is equipped at a time;
    /// buying a new one replaces it.
    pub rod: String,
    /// Owned bait counts. The default bait needs no entry to be usable.
    pub baits: HashMap<String, u32>,
    /// Catch inventory, in catch order. Emptied only by sell-all.
    pub caught: Vec<CaughtFish>,
    /// Monotone per-store creation sequence; leaderboard tie-break that
    /// survives restarts.
    pub created_seq: u64,
}

impl UserAccount {
    /// Creates a fresh account with the default rod, the starting coin
    /// grant, zero score, and an empty inventory.
    pub fn new(user_id: &str, display_name: &str, created_seq: u64) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            score: 0,
            coins: STARTING_COINS,
            rod: DEFAULT_ROD.to_string(),
            baits: HashMap::new(),
            caught: Vec::new(),
            created_seq,
        }
    }

    /// Owned count for a bait; unowned baits count as zero.
    pub fn bait_count(&self, name: &str) -> u32 {
        self.baits.get(name).copied().unwrap_or(0)
    }

    /// Catches allowed per quota window with the equipped rod.
    pub fn catch_capacity(&self) -> usize {
        BASE_CATCH_LIMIT + rod_quota_bonus(&self.rod)
    }
}
