//! # racelobby-types
//!
//! Shared types, errors, and configuration for the **RaceLobby** registry.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`ReceiptId`]
//! - **Lobby model**: [`LobbyRecord`], [`LobbyData`], [`TrackKeys`], [`TrackType`]
//! - **Token model**: [`TokenAccount`]
//! - **Fee schedule**: [`EntryFeeRequirements`]
//! - **Receipt model**: [`OperationReceipt`], [`ReceiptType`]
//! - **Configuration**: [`LobbyConfig`], [`MetadataBounds`]
//! - **Errors**: [`LobbyError`] with `RL_ERR_` prefix codes
//! - **Constants**: schema limits and defaults

pub mod address;
pub mod config;
pub mod constants;
pub mod error;
pub mod fee;
pub mod lobby;
pub mod receipt;
pub mod token;

pub use address::*;
pub use config::*;
pub use error::*;
pub use fee::*;
pub use lobby::*;
pub use receipt::*;
pub use token::*;

// Constants are accessed via `racelobby_types::constants::FOO`
// (not re-exported to avoid name collisions).
