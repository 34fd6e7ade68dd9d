//! Token account model.
//!
//! A token account holds a balance of exactly one mint on behalf of one
//! owner. Lobby vaults are token accounts whose owner is the lobby address.

use serde::{Deserialize, Serialize};

use crate::Address;

/// A balance of one mint held for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Address,
    pub owner: Address,
    /// Balance in the mint's smallest unit.
    pub amount: u64,
}

impl TokenAccount {
    /// An empty account.
    #[must_use]
    pub fn new(mint: Address, owner: Address) -> Self {
        Self {
            mint,
            owner,
            amount: 0,
        }
    }

    /// Whether this account holds `mint` for `owner`.
    #[must_use]
    pub fn is_held_by(&self, owner: &Address, mint: &Address) -> bool {
        self.owner == *owner && self.mint == *mint
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}
