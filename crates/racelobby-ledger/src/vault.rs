//! Lobby escrow vaults.
//!
//! A vault is the token account at `derive_vault_address(lobby, mint)` whose
//! owner is the lobby address itself. Custody is structural: no user key can
//! authorize a transfer out of a vault, only [`drain_and_close`] during a
//! lobby's teardown.

use racelobby_types::{Address, LobbyError, Result};

use crate::{
    derive::derive_vault_address,
    store::{Account, AccountView, Transaction},
    token,
};

/// Create the lobby's vault for `token_mint` if absent, or verify the
/// existing one. Returns the vault address either way.
///
/// # Errors
/// `VaultOwnershipMismatch` if the derived address holds an account that is
/// not a `token_mint` token account owned by `lobby`; `InvalidDerivation`
/// for default inputs.
pub fn ensure_vault(
    tx: &mut Transaction<'_>,
    lobby: &Address,
    token_mint: &Address,
    funding_party: &Address,
) -> Result<Address> {
    let vault = derive_vault_address(lobby, token_mint)?;
    match tx.account(&vault) {
        None => {
            token::create_account(tx, vault, *token_mint, *lobby)?;
            tracing::debug!(
                lobby = %lobby.short(),
                vault = %vault.short(),
                mint = %token_mint.short(),
                funded_by = %funding_party.short(),
                "Vault created"
            );
        }
        Some(Account::Token(existing)) if existing.is_held_by(lobby, token_mint) => {
            tracing::debug!(vault = %vault.short(), "Vault already present");
        }
        Some(Account::Token(existing)) => {
            let reason = if existing.owner == *lobby {
                format!("holds mint {} instead of {token_mint}", existing.mint)
            } else {
                format!("owned by {} instead of the lobby", existing.owner)
            };
            tracing::warn!(vault = %vault, %reason, "Vault ownership mismatch");
            return Err(LobbyError::VaultOwnershipMismatch {
                address: vault,
                reason,
            });
        }
        Some(other) => {
            let reason = format!("occupied by a {}", other.kind());
            tracing::warn!(vault = %vault, %reason, "Vault ownership mismatch");
            return Err(LobbyError::VaultOwnershipMismatch {
                address: vault,
                reason,
            });
        }
    }
    Ok(vault)
}

/// Move the vault's full balance to `destination`, then close the vault.
/// Returns the amount moved.
///
/// `destination` must not be owned by `lobby` or by any other lobby, so
/// balances never travel between vaults.
///
/// # Errors
/// `NotFound` for a missing vault or destination, `VaultOwnershipMismatch`
/// if the vault is not `lobby`'s or the destination is a vault, and token
/// errors from the transfer.
pub fn drain_and_close(
    tx: &mut Transaction<'_>,
    lobby: &Address,
    vault: &Address,
    destination: &Address,
) -> Result<u64> {
    let held = tx.token_account(vault)?;
    if held.owner != *lobby {
        return Err(LobbyError::VaultOwnershipMismatch {
            address: *vault,
            reason: format!("owned by {} instead of the lobby", held.owner),
        });
    }
    let amount = held.amount;

    let receiver = tx.token_account(destination)?;
    if receiver.owner == *lobby || matches!(tx.account(&receiver.owner), Some(Account::Lobby(_))) {
        return Err(LobbyError::VaultOwnershipMismatch {
            address: *destination,
            reason: "destination is a lobby vault".into(),
        });
    }

    token::transfer(tx, vault, destination, amount)?;
    token::close_account(tx, vault)?;
    tracing::debug!(
        lobby = %lobby.short(),
        vault = %vault.short(),
        destination = %destination.short(),
        amount,
        "Vault drained and closed"
    );
    Ok(amount)
}
