//! Error types for game actions and catalog validation.

use thiserror::Error;

/// Errors returned to the caller from game actions.
///
/// These are informational results for the presentation layer, not faults:
/// every variant except `Persistence` leaves account state untouched, and
/// `Persistence` is only returned after the in-memory mutation has been
/// rolled back.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The user's sliding-window catch limit is full.
    #[error("catch limit reached, try again in {wait_minutes} min")]
    QuotaExceeded { wait_minutes: i64 },

    /// Purchase costs more than the user's balance. No state change.
    #[error("not enough coins: need {price}, have {balance}")]
    InsufficientFunds { price: u64, balance: u64 },

    /// A non-default bait was chosen with zero owned.
    #[error("out of {bait}")]
    InsufficientStock { bait: String },

    /// Name does not match any rod or bait in the catalog.
    #[error("no such item: {name}")]
    UnknownItem { name: String },

    /// The durable write failed after retries; the mutation was rolled back.
    #[error("failed to persist account state")]
    Persistence(#[source] std::io::Error),
}

/// Fatal startup failures. The engine refuses to serve any action when
/// construction fails.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid game data")]
    Config(#[from] ConfigError),

    #[error("failed to load account snapshot")]
    Load(#[source] std::io::Error),
}

/// Fatal catalog problems detected at startup, before any state is touched.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rarity table for {bait}: tier probability {value} outside [0, 1]")]
    BadTierProbability { bait: String, value: f64 },

    #[error("rarity table for {bait}: ordinary probabilities sum to {sum}, expected (0, 1]")]
    BadProbabilitySum { bait: String, sum: f64 },

    #[error("rarity table for {bait}: bonus chance {value} outside [0, 1]")]
    BadBonusChance { bait: String, value: f64 },

    #[error("species table for {tier} has an empty normal pool")]
    EmptySpeciesPool { tier: String },

    #[error("default {kind} \"{name}\" is missing from the catalog")]
    MissingDefault { kind: &'static str, name: String },
}
