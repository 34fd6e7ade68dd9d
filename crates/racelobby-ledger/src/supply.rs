//! Supply conservation invariant checker.
//!
//! Invariant checked after every lifecycle operation:
//! ```text
//! ∀ mint: Σ(token account balances) == Σ(issued)
//! ```
//!
//! Creating, updating, or closing a lobby only moves tokens between
//! accounts, so no lobby operation may change the sum for any mint.

use std::collections::{BTreeSet, HashMap};

use racelobby_types::{Address, LobbyError, Result};

use crate::store::AccountStore;

/// Tracks per-mint issuance and validates conservation.
#[derive(Debug, Default)]
pub struct SupplyConservation {
    issued: HashMap<Address, u128>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            issued: HashMap::new(),
        }
    }

    /// Record newly issued tokens.
    pub fn record_issue(&mut self, mint: &Address, amount: u64) {
        *self.issued.entry(*mint).or_insert(0) += u128::from(amount);
    }

    /// Expected circulating supply for a mint.
    #[must_use]
    pub fn expected_supply(&self, mint: &Address) -> u128 {
        self.issued.get(mint).copied().unwrap_or(0)
    }

    /// Sum of every token account balance for `mint` in `store`.
    #[must_use]
    pub fn actual_supply(store: &AccountStore, mint: &Address) -> u128 {
        store
            .token_accounts()
            .filter(|(_, acct)| acct.mint == *mint)
            .map(|(_, acct)| u128::from(acct.amount))
            .sum()
    }

    /// Verify that `actual_supply` matches the issued total for `mint`.
    ///
    /// # Errors
    /// Returns [`LobbyError::SupplyInvariantViolation`] if they differ.
    pub fn verify(&self, mint: &Address, actual_supply: u128) -> Result<()> {
        let expected = self.expected_supply(mint);
        if actual_supply != expected {
            return Err(LobbyError::SupplyInvariantViolation {
                reason: format!(
                    "mint {}: actual supply {actual_supply} != issued {expected}",
                    mint.short()
                ),
            });
        }
        Ok(())
    }

    /// Verify every tracked mint against `store`.
    ///
    /// # Errors
    /// The first [`LobbyError::SupplyInvariantViolation`] found.
    pub fn verify_all(&self, store: &AccountStore) -> Result<()> {
        for mint in self.tracked_mints() {
            self.verify(&mint, Self::actual_supply(store, &mint))?;
        }
        Ok(())
    }

    /// Every mint with recorded issuance, in address order.
    #[must_use]
    pub fn tracked_mints(&self) -> BTreeSet<Address> {
        self.issued.keys().copied().collect()
    }
}
