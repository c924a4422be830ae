//! Economy operations on a user account.
//!
//! Each operation is atomic with respect to the account it mutates: it
//! either applies fully or returns an error leaving the account untouched.
//! Quota admission and rarity resolution happen before `apply_catch`; this
//! module only enforces stock and affordability invariants.

use crate::account::UserAccount;
use crate::catch_generation::CatchOutcome;
use crate::errors::ActionError;
use crate::tackle::{Bait, Rod, DEFAULT_BAIT};

/// Applies a resolved catch: consumes one bait (unless it is the free
/// default), appends the fish to the inventory, credits score and coins.
///
/// Fails with `InsufficientStock` when a non-default bait has zero owned;
/// the default bait has no out-of-stock failure mode.
pub fn apply_catch(
    account: &mut UserAccount,
    bait_name: &str,
    outcome: &CatchOutcome,
) -> Result<(), ActionError> {
    if bait_name != DEFAULT_BAIT {
        let count = account.bait_count(bait_name);
        if count == 0 {
            return Err(ActionError::InsufficientStock {
                bait: bait_name.to_string(),
            });
        }
        account.baits.insert(bait_name.to_string(), count - 1);
    }

    account.caught.push(outcome.to_caught_fish());
    account.score += outcome.score_delta;
    account.coins += outcome.coins_delta;
    Ok(())
}

/// Buys `quantity` of a bait. Debits the full price up front and credits
/// the owned count; fails with `InsufficientFunds` without any change.
pub fn purchase_bait(
    account: &mut UserAccount,
    bait: &Bait,
    quantity: u32,
) -> Result<u64, ActionError> {
    let price = bait.price * u64::from(quantity);
    if account.coins < price {
        return Err(ActionError::InsufficientFunds {
            price,
            balance: account.coins,
        });
    }
    account.coins -= price;
    let owned = account.bait_count(bait.name);
    account.baits.insert(bait.name.to_string(), owned + quantity);
    Ok(account.coins)
}

/// Buys a rod and equips it. The previous rod is replaced outright: no
/// refund, no retained inventory. Equip is exclusive and lossy.
pub fn purchase_rod(account: &mut UserAccount, rod: &Rod) -> Result<u64, ActionError> {
    if account.coins < rod.price {
        return Err(ActionError::InsufficientFunds {
            price: rod.price,
            balance: account.coins,
        });
    }
    account.coins -= rod.price;
    account.rod = rod.name.to_string();
    Ok(account.coins)
}

/// Sells the entire catch inventory, all or nothing. Returns the number
/// of fish sold and the coins earned; an empty inventory is a no-op.
pub fn sell_all_catch(account: &mut UserAccount) -> (usize, u64) {
    let earned: u64 = account.caught.iter().map(|fish| fish.value).sum();
    let sold = account.caught.len();
    account.coins += earned;
    account.caught.clear();
    (sold, earned)
}
