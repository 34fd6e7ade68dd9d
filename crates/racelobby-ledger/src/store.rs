//! Account storage with all-or-nothing transactions.
//!
//! Lobby records and token accounts share one address space. Every
//! multi-step operation writes through a [`Transaction`]: reads see the
//! transaction's own writes first, then the committed store. Nothing reaches
//! the store until [`Transaction::commit`]; dropping the transaction discards
//! every staged write.

use std::collections::{BTreeMap, HashMap};

use racelobby_types::{Address, LobbyError, LobbyRecord, Result, TokenAccount};

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Lobby(LobbyRecord),
    Token(TokenAccount),
}

impl Account {
    /// Short name of the account kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lobby(_) => "lobby record",
            Self::Token(_) => "token account",
        }
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&TokenAccount> {
        match self {
            Self::Token(t) => Some(t),
            Self::Lobby(_) => None,
        }
    }

    #[must_use]
    pub fn as_lobby(&self) -> Option<&LobbyRecord> {
        match self {
            Self::Lobby(r) => Some(r),
            Self::Token(_) => None,
        }
    }
}

/// Read access to accounts, shared by the store and open transactions.
pub trait AccountView {
    fn account(&self, address: &Address) -> Option<&Account>;

    fn contains(&self, address: &Address) -> bool {
        self.account(address).is_some()
    }

    /// The token account at `address`.
    ///
    /// # Errors
    /// `NotFound` if absent, `VaultOwnershipMismatch` if another kind lives there.
    fn token_account(&self, address: &Address) -> Result<&TokenAccount> {
        match self.account(address) {
            None => Err(LobbyError::NotFound(*address)),
            Some(Account::Token(t)) => Ok(t),
            Some(other) => Err(LobbyError::VaultOwnershipMismatch {
                address: *address,
                reason: format!("expected token account, found {}", other.kind()),
            }),
        }
    }
}

/// Committed accounts keyed by address.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<Address, Account>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Open a transaction over this store.
    pub fn begin(&mut self) -> Transaction<'_> {
        Transaction {
            base: self,
            writes: BTreeMap::new(),
        }
    }

    /// Number of live accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate all token accounts.
    pub fn token_accounts(&self) -> impl Iterator<Item = (&Address, &TokenAccount)> {
        self.accounts
            .iter()
            .filter_map(|(addr, acct)| acct.as_token().map(|t| (addr, t)))
    }
}

impl AccountView for AccountStore {
    fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }
}

/// Staged writes over an [`AccountStore`].
///
/// `None` in the write set marks a deletion.
#[must_use = "a transaction has no effect unless committed"]
pub struct Transaction<'a> {
    base: &'a mut AccountStore,
    writes: BTreeMap<Address, Option<Account>>,
}

impl Transaction<'_> {
    /// Stage `account` at `address`, replacing whatever is there.
    pub fn put(&mut self, address: Address, account: Account) {
        self.writes.insert(address, Some(account));
    }

    /// Stage deletion of `address`. Returns the account that was visible.
    pub fn remove(&mut self, address: &Address) -> Option<Account> {
        let previous = self.account(address).cloned();
        if previous.is_some() {
            self.writes.insert(*address, None);
        }
        previous
    }

    /// Mutable access to the account at `address`, copying it into the
    /// write set on first touch.
    pub fn account_mut(&mut self, address: &Address) -> Option<&mut Account> {
        if !self.writes.contains_key(address) {
            let existing = self.base.accounts.get(address)?.clone();
            self.writes.insert(*address, Some(existing));
        }
        self.writes.get_mut(address).and_then(Option::as_mut)
    }

    /// Mutable token account at `address`.
    ///
    /// # Errors
    /// `NotFound` if absent, `VaultOwnershipMismatch` if another kind lives there.
    pub fn token_account_mut(&mut self, address: &Address) -> Result<&mut TokenAccount> {
        match self.account_mut(address) {
            None => Err(LobbyError::NotFound(*address)),
            Some(Account::Token(t)) => Ok(t),
            Some(other) => Err(LobbyError::VaultOwnershipMismatch {
                address: *address,
                reason: format!("expected token account, found {}", other.kind()),
            }),
        }
    }

    /// Number of staged writes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Apply every staged write to the store. Returns the number applied.
    pub fn commit(self) -> usize {
        let applied = self.writes.len();
        for (address, write) in self.writes {
            match write {
                Some(account) => {
                    self.base.accounts.insert(address, account);
                }
                None => {
                    self.base.accounts.remove(&address);
                }
            }
        }
        tracing::debug!(writes = applied, "Transaction committed");
        applied
    }
}

impl AccountView for Transaction<'_> {
    fn account(&self, address: &Address) -> Option<&Account> {
        match self.writes.get(address) {
            Some(staged) => staged.as_ref(),
            None => self.base.accounts.get(address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(amount: u64) -> Account {
        Account::Token(TokenAccount {
            mint: Address([1; 32]),
            owner: Address([2; 32]),
            amount,
        })
    }

    #[test]
    fn committed_writes_visible() {
        let mut store = AccountStore::new();
        let addr = Address([7; 32]);
        let mut tx = store.begin();
        tx.put(addr, token(5));
        assert_eq!(tx.pending(), 1);
        assert_eq!(tx.commit(), 1);
        assert_eq!(store.token_account(&addr).unwrap().amount, 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn dropped_transaction_discards_writes() {
        let mut store = AccountStore::new();
        let addr = Address([7; 32]);
        {
            let mut tx = store.begin();
            tx.put(addr, token(5));
            assert!(tx.contains(&addr));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn reads_see_own_writes_and_deletes() {
        let mut store = AccountStore::new();
        let addr = Address([7; 32]);
        let mut tx = store.begin();
        tx.put(addr, token(1));
        tx.commit();

        let mut tx = store.begin();
        assert!(tx.remove(&addr).is_some());
        assert!(!tx.contains(&addr));
        assert!(tx.remove(&addr).is_none());
        drop(tx);
        assert!(store.contains(&addr), "uncommitted delete must not apply");

        let mut tx = store.begin();
        tx.remove(&addr);
        tx.commit();
        assert!(!store.contains(&addr));
    }

    #[test]
    fn account_mut_copies_on_write() {
        let mut store = AccountStore::new();
        let addr = Address([7; 32]);
        let mut tx = store.begin();
        tx.put(addr, token(10));
        tx.commit();

        let mut tx = store.begin();
        tx.token_account_mut(&addr).unwrap().amount = 3;
        assert_eq!(tx.token_account(&addr).unwrap().amount, 3);
        drop(tx);
        assert_eq!(store.token_account(&addr).unwrap().amount, 10);
    }

    #[test]
    fn token_account_wrong_kind() {
        let mut store = AccountStore::new();
        let missing = Address([9; 32]);
        assert!(matches!(
            store.token_account(&missing).unwrap_err(),
            LobbyError::NotFound(a) if a == missing
        ));
        let mut tx = store.begin();
        assert!(tx.token_account_mut(&missing).is_err());
        assert!(tx.account_mut(&missing).is_none());
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn token_accounts_iterates_tokens_only() {
        let mut store = AccountStore::new();
        let mut tx = store.begin();
        tx.put(Address([1; 32]), token(1));
        tx.put(Address([2; 32]), token(2));
        tx.commit();
        let total: u64 = store.token_accounts().map(|(_, t)| t.amount).sum();
        assert_eq!(total, 3);
    }
}
