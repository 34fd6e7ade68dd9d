//! Token primitive: create, mint, transfer, and close token accounts.
//!
//! Every function writes through a [`Transaction`], so a failure part way
//! through a caller's operation leaves no trace. Authorization is not
//! checked here; callers decide who may move which balance.

use racelobby_types::{Address, LobbyError, Result, TokenAccount};

use crate::store::{Account, AccountView, Transaction};

/// Create an empty token account for `mint` held by `owner` at `address`.
///
/// # Errors
/// Returns `AlreadyExists` if any account occupies `address`.
pub fn create_account(
    tx: &mut Transaction<'_>,
    address: Address,
    mint: Address,
    owner: Address,
) -> Result<()> {
    if tx.contains(&address) {
        return Err(LobbyError::AlreadyExists(address));
    }
    tx.put(address, Account::Token(TokenAccount::new(mint, owner)));
    Ok(())
}

/// Credit newly issued tokens to `address`.
///
/// # Errors
/// `NotFound` if the account is absent, `ArithmeticOverflow` if the balance
/// would exceed `u64::MAX`.
pub fn mint_to(tx: &mut Transaction<'_>, address: &Address, amount: u64) -> Result<()> {
    let account = tx.token_account_mut(address)?;
    account.amount = account
        .amount
        .checked_add(amount)
        .ok_or(LobbyError::ArithmeticOverflow)?;
    Ok(())
}

/// Move `amount` from `from` to `to`.
///
/// Both accounts must exist and hold the same mint. A zero-amount transfer
/// succeeds without writing.
///
/// # Errors
/// `NotFound`, `MintMismatch`, `InsufficientFunds`, or `ArithmeticOverflow`.
pub fn transfer(tx: &mut Transaction<'_>, from: &Address, to: &Address, amount: u64) -> Result<()> {
    let source = tx.token_account(from)?;
    let destination = tx.token_account(to)?;
    if source.mint != destination.mint {
        return Err(LobbyError::MintMismatch {
            expected: source.mint,
            actual: destination.mint,
        });
    }
    if source.amount < amount {
        return Err(LobbyError::InsufficientFunds {
            needed: amount,
            available: source.amount,
        });
    }
    let credited = destination
        .amount
        .checked_add(amount)
        .ok_or(LobbyError::ArithmeticOverflow)?;
    if amount == 0 || from == to {
        return Ok(());
    }

    tx.token_account_mut(from)?.amount -= amount;
    tx.token_account_mut(to)?.amount = credited;
    Ok(())
}

/// Delete an empty token account and return its final state.
///
/// # Errors
/// `NotFound` if absent, `AccountNotEmpty` if it still holds a balance.
pub fn close_account(tx: &mut Transaction<'_>, address: &Address) -> Result<TokenAccount> {
    let account = tx.token_account(address)?;
    if !account.is_empty() {
        return Err(LobbyError::AccountNotEmpty {
            address: *address,
            amount: account.amount,
        });
    }
    let closed = account.clone();
    tx.remove(address);
    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AccountStore;

    const MINT: Address = Address([1; 32]);
    const OTHER_MINT: Address = Address([2; 32]);
    const A: Address = Address([10; 32]);
    const B: Address = Address([11; 32]);
    const C: Address = Address([12; 32]);

    fn setup() -> AccountStore {
        let mut store = AccountStore::new();
        let mut tx = store.begin();
        create_account(&mut tx, A, MINT, Address([20; 32])).unwrap();
        create_account(&mut tx, B, MINT, Address([21; 32])).unwrap();
        create_account(&mut tx, C, OTHER_MINT, Address([22; 32])).unwrap();
        mint_to(&mut tx, &A, 500).unwrap();
        tx.commit();
        store
    }

    #[test]
    fn create_rejects_occupied_address() {
        let mut store = setup();
        let mut tx = store.begin();
        let err = create_account(&mut tx, A, MINT, Address([20; 32])).unwrap_err();
        assert_eq!(err, LobbyError::AlreadyExists(A));
    }

    #[test]
    fn transfer_moves_balance() {
        let mut store = setup();
        let mut tx = store.begin();
        transfer(&mut tx, &A, &B, 200).unwrap();
        tx.commit();
        assert_eq!(store.token_account(&A).unwrap().amount, 300);
        assert_eq!(store.token_account(&B).unwrap().amount, 200);
    }

    #[test]
    fn transfer_insufficient_funds() {
        let mut store = setup();
        let mut tx = store.begin();
        let err = transfer(&mut tx, &A, &B, 501).unwrap_err();
        assert_eq!(
            err,
            LobbyError::InsufficientFunds {
                needed: 501,
                available: 500
            }
        );
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn transfer_across_mints_rejected() {
        let mut store = setup();
        let mut tx = store.begin();
        let err = transfer(&mut tx, &A, &C, 1).unwrap_err();
        assert!(matches!(err, LobbyError::MintMismatch { .. }));
    }

    #[test]
    fn transfer_to_missing_account() {
        let mut store = setup();
        let mut tx = store.begin();
        let missing = Address([99; 32]);
        assert_eq!(
            transfer(&mut tx, &A, &missing, 1).unwrap_err(),
            LobbyError::NotFound(missing)
        );
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut store = setup();
        let mut tx = store.begin();
        let err = mint_to(&mut tx, &A, u64::MAX).unwrap_err();
        assert_eq!(err, LobbyError::ArithmeticOverflow);
    }

    #[test]
    fn close_requires_empty() {
        let mut store = setup();
        let mut tx = store.begin();
        let err = close_account(&mut tx, &A).unwrap_err();
        assert_eq!(
            err,
            LobbyError::AccountNotEmpty {
                address: A,
                amount: 500
            }
        );
        let closed = close_account(&mut tx, &B).unwrap();
        assert_eq!(closed.mint, MINT);
        tx.commit();
        assert!(!store.contains(&B));
        assert!(store.contains(&A));
    }
}
