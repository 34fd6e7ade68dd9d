//! Deterministic address derivation.
//!
//! A lobby lives at `SHA-256(LOBBY_SEED || owner || track_mint)`; a personal
//! token account at `SHA-256(TOKEN_ACCOUNT_SEED || holder || mint)`; a vault
//! at `SHA-256(VAULT_SEED || lobby || mint)`, so vaults can be found without a
//! lookup table. Vault addresses never coincide with personal account
//! addresses, which keeps them out of reach of the holder-facing ledger
//! entry points. Anyone may derive any address; addresses are public.

use racelobby_types::{
    Address, LobbyError, Result,
    constants::{LOBBY_SEED, TOKEN_ACCOUNT_SEED, VAULT_SEED},
};
use sha2::{Digest, Sha256};

/// Address of the lobby owned by `owner` for `track_mint`.
///
/// # Errors
/// Returns `InvalidDerivation` if either input is the default address.
pub fn derive_lobby_address(owner: &Address, track_mint: &Address) -> Result<Address> {
    require_set("owner", owner)?;
    require_set("track mint", track_mint)?;
    Ok(hash_pair(LOBBY_SEED, owner, track_mint))
}

/// Address of `holder`'s token account for `mint`.
///
/// # Errors
/// Returns `InvalidDerivation` if either input is the default address.
pub fn derive_token_address(holder: &Address, mint: &Address) -> Result<Address> {
    require_set("holder", holder)?;
    require_set("mint", mint)?;
    Ok(hash_pair(TOKEN_ACCOUNT_SEED, holder, mint))
}

/// Address of `lobby`'s escrow vault for `token_mint`.
///
/// # Errors
/// Returns `InvalidDerivation` if either input is the default address.
pub fn derive_vault_address(lobby: &Address, token_mint: &Address) -> Result<Address> {
    require_set("lobby", lobby)?;
    require_set("token mint", token_mint)?;
    Ok(hash_pair(VAULT_SEED, lobby, token_mint))
}

fn require_set(what: &str, address: &Address) -> Result<()> {
    if address.is_default() {
        return Err(LobbyError::InvalidDerivation {
            reason: format!("{what} is the default address"),
        });
    }
    Ok(())
}

fn hash_pair(seed: &[u8], a: &Address, b: &Address) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(a.as_bytes());
    hasher.update(b.as_bytes());
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    Address(out)
}
