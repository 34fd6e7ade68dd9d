//! Lobby record storage.
//!
//! Records are keyed exactly by their derived address. Every write is
//! validated against the schema bounds before it is staged; invalid records
//! are rejected, never clamped.

use racelobby_types::{Address, LobbyError, LobbyRecord, MetadataBounds, Result};

use crate::store::{Account, AccountView, Transaction};

/// Validated access to lobby records in the account store.
#[derive(Debug, Clone, Default)]
pub struct LobbyRecordStore {
    bounds: MetadataBounds,
}

impl LobbyRecordStore {
    #[must_use]
    pub fn new(bounds: MetadataBounds) -> Self {
        Self { bounds }
    }

    #[must_use]
    pub fn bounds(&self) -> &MetadataBounds {
        &self.bounds
    }

    /// Write `record` at `address`, replacing any existing record.
    ///
    /// # Errors
    /// `InvalidMetadata` if the record fails validation,
    /// `VaultOwnershipMismatch` if a token account occupies `address`.
    pub fn put(&self, tx: &mut Transaction<'_>, address: Address, record: LobbyRecord) -> Result<()> {
        record.validate(&self.bounds)?;
        if let Some(Account::Token(_)) = tx.account(&address) {
            return Err(LobbyError::VaultOwnershipMismatch {
                address,
                reason: "address holds a token account".into(),
            });
        }
        tx.put(address, Account::Lobby(record));
        Ok(())
    }

    /// The record at `address`.
    ///
    /// # Errors
    /// `NotFound` if no lobby record lives there.
    pub fn get<'v>(&self, view: &'v impl AccountView, address: &Address) -> Result<&'v LobbyRecord> {
        view.account(address)
            .and_then(Account::as_lobby)
            .ok_or(LobbyError::NotFound(*address))
    }

    /// Stage deletion of the record at `address` and return it.
    ///
    /// # Errors
    /// `NotFound` if no lobby record lives there.
    pub fn delete(&self, tx: &mut Transaction<'_>, address: &Address) -> Result<LobbyRecord> {
        let record = self.get(&*tx, address)?.clone();
        tx.remove(address);
        Ok(record)
    }
}
