//! # racelobby-core
//!
//! Lifecycle controller for the **RaceLobby** registry.
//!
//! - [`LobbyController`]: Create / UpdateMetadata / Close / Get, plus the
//!   entry fee schedule
//! - [`SignerSet`]: identities that authorized a call, built from verified
//!   ed25519 signatures at the boundary
//! - [`OperationJournal`]: append-only receipts for committed operations
//!
//! ## Authorization
//!
//! | Operation               | Required signers                      |
//! |-------------------------|---------------------------------------|
//! | Create                  | owner AND authority (distinct)        |
//! | UpdateMetadata          | stored owner                          |
//! | Close                   | stored owner                          |
//! | SetEntryFeeRequirements | configured state authority            |
//!
//! Once created, a lobby's authority never needs to sign again.
//!
//! ## Custody
//!
//! Each lobby owns two vaults (game token, track token) at addresses derived
//! from the lobby address. Close drains both back to the owner's personal
//! accounts and deletes the record in one transaction.

pub mod auth;
pub mod controller;
pub mod journal;

pub use auth::{SignerSet, operation_message};
pub use controller::{ClosedLobby, CreateLobby, LobbyController};
pub use journal::OperationJournal;
