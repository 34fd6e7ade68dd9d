//! # racelobby-ledger
//!
//! **Reference ledger** for the RaceLobby registry: the account storage,
//! token primitive, and custody components the lifecycle controller runs on.
//!
//! ## Architecture
//!
//! 1. **derive**: pure address derivation for lobbies and token accounts
//! 2. **AccountStore / Transaction**: one keyed store for lobby records and
//!    token accounts, with a write overlay that commits or is discarded
//! 3. **token**: create / mint / transfer / close on token accounts
//! 4. **vault**: lobby-owned escrow vaults (ensure, drain-and-close)
//! 5. **LobbyRecordStore**: validated put / get / delete of lobby records
//! 6. **SupplyConservation**: per-mint supply invariant
//!
//! ## Atomicity
//!
//! ```text
//! Ledger.execute(|tx| { vault::ensure_vault(tx, ..)?; records.put(tx, ..)?; Ok(..) })
//!     Ok  → tx.commit()   (all writes applied)
//!     Err → tx dropped    (no writes applied)
//! ```

pub mod derive;
pub mod ledger;
pub mod records;
pub mod store;
pub mod supply;
pub mod token;
pub mod vault;

pub use derive::{derive_lobby_address, derive_token_address, derive_vault_address};
pub use ledger::Ledger;
pub use records::LobbyRecordStore;
pub use store::{Account, AccountStore, AccountView, Transaction};
pub use supply::SupplyConservation;
