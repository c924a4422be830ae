//! Game service façade.
//!
//! `GameService` owns the account registry, the quota log, and the save
//! manager, and exposes the surface the presentation layer calls. Every
//! read-modify-write-persist sequence for one user runs under that user's
//! exclusive lock; operations on distinct users proceed independently.
//! The registry lock is held only long enough to fetch or insert a user's
//! entry, never across a whole sequence.

use crate::account::UserAccount;
use crate::catch_generation::{generate_catch, roll_bonus, roll_rarity, CatchOutcome};
use crate::economy;
use crate::errors::{ActionError, InitError};
use crate::quota::{QuotaDecision, QuotaTracker};
use crate::save_manager::SaveManager;
use crate::tackle::{find_bait, find_rod, validate_catalog, BAITS, DEFAULT_BAIT, DEFAULT_ROD, RODS};
use chrono::Utc;
use log::{error, info};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Reply to a start-action request: either the bait menu or a quota
/// rejection with actionable wait feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartAction {
    /// Baits the user can cast with right now: the free default always,
    /// purchased baits only while owned.
    pub available_baits: Vec<BaitChoice>,
    pub rejected: bool,
    pub wait_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaitChoice {
    pub name: String,
    pub owned: u32,
}

/// What the shop currently offers a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopOffers {
    pub baits: Vec<BaitOffer>,
    pub rods: Vec<RodOffer>,
    pub sellable_fish: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaitOffer {
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RodOffer {
    pub name: String,
    pub price: u64,
    pub quota_bonus: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseKind {
    Bait,
    Rod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellReport {
    pub sold: usize,
    pub coins_earned: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub display_name: String,
    pub score: u64,
}

struct Registry {
    entries: HashMap<String, Arc<Mutex<UserAccount>>>,
    next_seq: u64,
}

pub struct GameService {
    registry: Mutex<Registry>,
    /// Persisted view of every account, updated in step with the live
    /// entries. What `save_all` writes and what the leaderboard reads.
    snapshots: Mutex<HashMap<String, UserAccount>>,
    quota: Mutex<QuotaTracker>,
    store: SaveManager,
}

impl GameService {
    /// Validates the catalog, loads the snapshot, and builds the live
    /// registry. Any failure here is fatal; no actions are served.
    pub fn new(store: SaveManager) -> Result<Self, InitError> {
        validate_catalog()?;
        let loaded = store.load().map_err(InitError::Load)?;
        info!("loaded {} account(s)", loaded.len());

        let next_seq = loaded
            .values()
            .map(|account| account.created_seq)
            .max()
            .map_or(1, |max| max + 1);
        let entries = loaded
            .iter()
            .map(|(id, account)| (id.clone(), Arc::new(Mutex::new(account.clone()))))
            .collect();

        Ok(Self {
            registry: Mutex::new(Registry { entries, next_seq }),
            snapshots: Mutex::new(loaded),
            quota: Mutex::new(QuotaTracker::new()),
            store,
        })
    }

    /// Begins an action for a user, creating the account on first
    /// contact. Checks the quota but does not consume a slot; the slot is
    /// claimed when the action resolves.
    pub fn start_action(&self, user_id: &str, display_name: &str) -> StartAction {
        self.start_action_at(user_id, display_name, Utc::now().timestamp())
    }

    /// Clock-injected variant of [`Self::start_action`].
    pub fn start_action_at(&self, user_id: &str, display_name: &str, now: i64) -> StartAction {
        let entry = self.entry_for(user_id, display_name);
        let account = entry.lock().expect("account lock poisoned");

        let decision = self
            .quota
            .lock()
            .expect("quota lock poisoned")
            .check(user_id, now, account.catch_capacity());

        match decision {
            QuotaDecision::Rejected { wait_minutes } => StartAction {
                available_baits: Vec::new(),
                rejected: true,
                wait_minutes: Some(wait_minutes),
            },
            QuotaDecision::Admitted { .. } => {
                let available_baits = BAITS
                    .iter()
                    .filter(|bait| bait.name == DEFAULT_BAIT || account.bait_count(bait.name) > 0)
                    .map(|bait| BaitChoice {
                        name: bait.name.to_string(),
                        owned: account.bait_count(bait.name),
                    })
                    .collect();
                StartAction {
                    available_baits,
                    rejected: false,
                    wait_minutes: None,
                }
            }
        }
    }

    /// Resolves a cast with the chosen bait: admits against the quota,
    /// rolls the catch, applies it to the account, and persists.
    pub fn resolve_action(&self, user_id: &str, bait_name: &str) -> Result<CatchOutcome, ActionError> {
        self.resolve_action_at(user_id, bait_name, Utc::now().timestamp(), &mut rand::thread_rng())
    }

    /// Clock- and rng-injected variant of [`Self::resolve_action`].
    ///
    /// The whole sequence runs under the user's lock, so two concurrent
    /// resolves for the same user serialize and the second sees the
    /// first's recorded timestamp: one remaining slot never admits both.
    pub fn resolve_action_at(
        &self,
        user_id: &str,
        bait_name: &str,
        now: i64,
        rng: &mut impl Rng,
    ) -> Result<CatchOutcome, ActionError> {
        let entry = self.entry_for(user_id, user_id);
        let mut account = entry.lock().expect("account lock poisoned");

        let decision = self
            .quota
            .lock()
            .expect("quota lock poisoned")
            .check(user_id, now, account.catch_capacity());
        if let QuotaDecision::Rejected { wait_minutes } = decision {
            return Err(ActionError::QuotaExceeded { wait_minutes });
        }

        let bait = find_bait(bait_name).ok_or_else(|| ActionError::UnknownItem {
            name: bait_name.to_string(),
        })?;
        if bait.name != DEFAULT_BAIT && account.bait_count(bait.name) == 0 {
            return Err(ActionError::InsufficientStock {
                bait: bait.name.to_string(),
            });
        }

        // Quota and stock both cleared: the action proceeds and counts
        // against the window even if the write below has to roll back.
        self.quota
            .lock()
            .expect("quota lock poisoned")
            .record(user_id, now);

        let tier = roll_rarity(&bait.table, rng);
        let bonus = roll_bonus(&bait.table, rng);
        let outcome = generate_catch(tier, bonus, rng);

        let backup = account.clone();
        economy::apply_catch(&mut account, bait.name, &outcome)?;
        if let Err(e) = self.persist(user_id, &account) {
            *account = backup;
            return Err(e);
        }

        info!(
            "{} caught a {} {} ({} pts, {} coins)",
            user_id,
            outcome.tier.label(),
            outcome.species,
            outcome.score_delta,
            outcome.coins_delta
        );
        Ok(outcome)
    }

    /// Shop listing: purchasable baits and rods (the free defaults are
    /// never offered) plus the user's sellable fish count.
    pub fn list_shop_offers(&self, user_id: &str) -> ShopOffers {
        let entry = self.entry_for(user_id, user_id);
        let account = entry.lock().expect("account lock poisoned");

        ShopOffers {
            baits: BAITS
                .iter()
                .filter(|bait| bait.name != DEFAULT_BAIT)
                .map(|bait| BaitOffer {
                    name: bait.name.to_string(),
                    price: bait.price,
                })
                .collect(),
            rods: RODS
                .iter()
                .filter(|rod| rod.name != DEFAULT_ROD)
                .map(|rod| RodOffer {
                    name: rod.name.to_string(),
                    price: rod.price,
                    quota_bonus: rod.quota_bonus,
                })
                .collect(),
            sellable_fish: account.caught.len(),
        }
    }

    /// Buys one bait or rod by name. Returns the new balance.
    pub fn purchase(
        &self,
        user_id: &str,
        kind: PurchaseKind,
        name: &str,
    ) -> Result<u64, ActionError> {
        let entry = self.entry_for(user_id, user_id);
        let mut account = entry.lock().expect("account lock poisoned");
        let backup = account.clone();

        let balance = match kind {
            PurchaseKind::Bait => {
                let bait = find_bait(name).ok_or_else(|| ActionError::UnknownItem {
                    name: name.to_string(),
                })?;
                economy::purchase_bait(&mut account, bait, 1)?
            }
            PurchaseKind::Rod => {
                let rod = find_rod(name).ok_or_else(|| ActionError::UnknownItem {
                    name: name.to_string(),
                })?;
                economy::purchase_rod(&mut account, rod)?
            }
        };

        if let Err(e) = self.persist(user_id, &account) {
            *account = backup;
            return Err(e);
        }

        info!("{} bought {} ({} coins left)", user_id, name, balance);
        Ok(balance)
    }

    /// Sells the user's entire catch. An empty inventory reports zero
    /// sold and skips the durable write (nothing changed).
    pub fn sell_all(&self, user_id: &str) -> Result<SellReport, ActionError> {
        let entry = self.entry_for(user_id, user_id);
        let mut account = entry.lock().expect("account lock poisoned");
        let backup = account.clone();

        let (sold, coins_earned) = economy::sell_all_catch(&mut account);
        if sold > 0 {
            if let Err(e) = self.persist(user_id, &account) {
                *account = backup;
                return Err(e);
            }
            info!("{} sold {} fish for {} coins", user_id, sold, coins_earned);
        }

        Ok(SellReport { sold, coins_earned })
    }

    /// Read-only account view, or None for a user never seen.
    pub fn account_summary(&self, user_id: &str) -> Option<UserAccount> {
        let entry = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            registry.entries.get(user_id).cloned()
        }?;
        let account = entry.lock().expect("account lock poisoned");
        Some(account.clone())
    }

    /// Top accounts by score, descending. Ties keep account creation
    /// order, which is stable across restarts.
    pub fn leaderboard(&self, top_n: usize) -> Vec<LeaderboardRow> {
        let snapshots = self.snapshots.lock().expect("snapshot lock poisoned");
        let mut rows: Vec<(String, u64, u64)> = snapshots
            .values()
            .map(|account| (account.display_name.clone(), account.score, account.created_seq))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        rows.truncate(top_n);
        rows.into_iter()
            .map(|(display_name, score, _)| LeaderboardRow { display_name, score })
            .collect()
    }

    /// Fetches a user's live entry, creating the account on first
    /// contact. Paths that have no display name at hand (purchases,
    /// sales) fall back to the user id; `start_action` is the normal
    /// entry point and supplies the real name.
    fn entry_for(&self, user_id: &str, display_name: &str) -> Arc<Mutex<UserAccount>> {
        let mut registry = self.registry.lock().expect("registry lock poisoned");
        if let Some(entry) = registry.entries.get(user_id) {
            return Arc::clone(entry);
        }

        let seq = registry.next_seq;
        registry.next_seq += 1;
        let account = UserAccount::new(user_id, display_name, seq);
        self.snapshots
            .lock()
            .expect("snapshot lock poisoned")
            .insert(user_id.to_string(), account.clone());
        let entry = Arc::new(Mutex::new(account));
        registry.entries.insert(user_id.to_string(), Arc::clone(&entry));
        info!("created account for {} ({})", display_name, user_id);
        entry
    }

    /// Updates the persisted view and writes the full snapshot. On
    /// failure the persisted view is restored and the caller rolls back
    /// the live account, so memory and disk never diverge.
    fn persist(&self, user_id: &str, account: &UserAccount) -> Result<(), ActionError> {
        let mut snapshots = self.snapshots.lock().expect("snapshot lock poisoned");
        let previous = snapshots.insert(user_id.to_string(), account.clone());
        match self.store.save_all(&snapshots) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("snapshot write for {} failed after retries: {}", user_id, e);
                match previous {
                    Some(prev) => {
                        snapshots.insert(user_id.to_string(), prev);
                    }
                    None => {
                        snapshots.remove(user_id);
                    }
                }
                Err(ActionError::Persistence(e))
            }
        }
    }
}
