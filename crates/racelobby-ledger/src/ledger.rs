//! Ledger facade: the account store plus supply bookkeeping.
//!
//! Outside the lobby lifecycle, token movement goes through the holder-
//! authorized entry points here. Lobby operations use [`Ledger::execute`] to
//! run several steps as one all-or-nothing unit.
//!
//! Lobby addresses are public and have no key, so they are never accepted as
//! a holder here: accounts in lobby custody are reachable only through the
//! vault manager.

use racelobby_types::{Address, LobbyError, Result};

use crate::{
    derive::{derive_token_address, derive_vault_address},
    store::{Account, AccountStore, AccountView, Transaction},
    supply::SupplyConservation,
    token,
};

/// In-memory ledger of lobby records and token accounts.
#[derive(Debug, Default)]
pub struct Ledger {
    store: AccountStore,
    supply: SupplyConservation,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: AccountStore::new(),
            supply: SupplyConservation::new(),
        }
    }

    /// Run `op` inside a transaction. Its writes are committed only if it
    /// returns `Ok`; on `Err` nothing is applied.
    ///
    /// # Errors
    /// Whatever `op` returns.
    pub fn execute<T>(&mut self, op: impl FnOnce(&mut Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut tx = self.store.begin();
        let out = op(&mut tx)?;
        tx.commit();
        Ok(out)
    }

    /// Open `owner`'s personal token account for `mint` at its derived
    /// address.
    ///
    /// # Errors
    /// `InvalidDerivation` for default inputs, `Unauthorized` if `owner` is a
    /// lobby address, `AlreadyExists` if open.
    pub fn open_token_account(&mut self, owner: &Address, mint: &Address) -> Result<Address> {
        if self.is_lobby(owner) {
            tracing::warn!(
                owner = %owner.short(),
                mint = %mint.short(),
                "Token account rejected: holder is a lobby address"
            );
            return Err(LobbyError::unauthorized(
                "a lobby address cannot hold a personal token account",
            ));
        }
        let address = derive_token_address(owner, mint)?;
        self.execute(|tx| token::create_account(tx, address, *mint, *owner))?;
        tracing::debug!(
            owner = %owner.short(),
            mint = %mint.short(),
            account = %address.short(),
            "Token account opened"
        );
        Ok(address)
    }

    /// Issue `amount` new tokens into `address`.
    ///
    /// # Errors
    /// `NotFound` if the account is absent, `ArithmeticOverflow` on overflow.
    pub fn mint_to(&mut self, address: &Address, amount: u64) -> Result<()> {
        let mint = self.store.token_account(address)?.mint;
        self.execute(|tx| token::mint_to(tx, address, amount))?;
        self.supply.record_issue(&mint, amount);
        Ok(())
    }

    /// Holder-authorized transfer between token accounts.
    ///
    /// # Errors
    /// `Unauthorized` if `from` is in lobby custody or `authorizer` does not
    /// hold it; otherwise token errors from the transfer.
    pub fn transfer(
        &mut self,
        authorizer: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<()> {
        let source = self.store.token_account(from)?;
        let (holder, mint) = (source.owner, source.mint);
        if self.is_lobby(&holder) || derive_vault_address(&holder, &mint).ok() == Some(*from) {
            tracing::warn!(
                authorizer = %authorizer.short(),
                account = %from.short(),
                "Transfer rejected: source account is in lobby custody"
            );
            return Err(LobbyError::unauthorized(
                "vault balances move only through lobby close",
            ));
        }
        if holder != *authorizer {
            tracing::warn!(
                authorizer = %authorizer.short(),
                account = %from.short(),
                "Transfer rejected: signer does not hold the source account"
            );
            return Err(LobbyError::unauthorized(
                "signer does not hold the source account",
            ));
        }
        self.execute(|tx| token::transfer(tx, from, to, amount))
    }

    /// Balance of the token account at `address`.
    ///
    /// # Errors
    /// `NotFound` if absent.
    pub fn balance(&self, address: &Address) -> Result<u64> {
        Ok(self.store.token_account(address)?.amount)
    }

    /// Verify supply conservation for one mint.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` if balances and issuance disagree.
    pub fn verify_supply(&self, mint: &Address) -> Result<()> {
        self.supply
            .verify(mint, SupplyConservation::actual_supply(&self.store, mint))
    }

    /// Verify supply conservation for every mint ever issued.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` on the first mint that disagrees.
    pub fn verify_all_supply(&self) -> Result<()> {
        self.supply.verify_all(&self.store)
    }

    fn is_lobby(&self, address: &Address) -> bool {
        matches!(self.store.account(address), Some(Account::Lobby(_)))
    }

    #[must_use]
    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }
}

impl AccountView for Ledger {
    fn account(&self, address: &Address) -> Option<&Account> {
        self.store.account(address)
    }
}
