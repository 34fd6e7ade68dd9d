//! Lobby lifecycle controller.
//!
//! Sequences derivation, vault custody, and record persistence for the three
//! lifecycle operations:
//!
//! ```text
//! Absent ──Create(owner + authority)──▶ Active ──Close(owner)──▶ Absent
//!                                        │  ▲
//!                                        └──┘ UpdateMetadata(owner)
//! ```
//!
//! Each operation runs in a single ledger transaction. An error at any step
//! discards every write of that operation, including vault creation or
//! draining, and no receipt is issued. Receipt payloads are serialized before
//! the transaction commits, so nothing can fail after it.

use chrono::{DateTime, TimeDelta, Utc};
use racelobby_ledger::{
    AccountView, Ledger, LobbyRecordStore, Transaction, derive_lobby_address,
    derive_token_address, vault,
};
use racelobby_types::{
    Address, EntryFeeRequirements, LobbyConfig, LobbyData, LobbyError, LobbyRecord,
    OperationReceipt, ReceiptType, Result, TrackKeys, constants,
};
use serde::Serialize;

use crate::{auth::SignerSet, journal::OperationJournal};

// ---------------------------------------------------------------------------
// Requests and results
// ---------------------------------------------------------------------------

/// Arguments of a Create call.
#[derive(Debug, Clone)]
pub struct CreateLobby {
    /// Track holder; must sign.
    pub owner: Address,
    /// State authority; must sign and differ from `owner`.
    pub authority: Address,
    pub track_mint: Address,
    /// Opaque metadata-registry address of the track asset.
    pub track_metadata: Address,
    pub lobby_data: LobbyData,
}

/// Outcome of a Close call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedLobby {
    pub address: Address,
    /// The record as it was at teardown.
    pub record: LobbyRecord,
    /// Game tokens returned to the owner's game token account.
    pub game_tokens_returned: u64,
    /// Track tokens returned to the owner's track token account.
    pub track_tokens_returned: u64,
}

// ---------------------------------------------------------------------------
// LobbyController
// ---------------------------------------------------------------------------

/// Runs lobby operations against a ledger.
#[derive(Debug)]
pub struct LobbyController {
    config: LobbyConfig,
    ledger: Ledger,
    records: LobbyRecordStore,
    journal: OperationJournal,
}

impl LobbyController {
    /// Controller over an empty ledger.
    ///
    /// # Errors
    /// `Configuration` if `config` is invalid.
    pub fn new(config: LobbyConfig) -> Result<Self> {
        Self::with_ledger(config, Ledger::new())
    }

    /// Controller over an existing ledger.
    ///
    /// # Errors
    /// `Configuration` if `config` is invalid.
    pub fn with_ledger(config: LobbyConfig, ledger: Ledger) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            registry = constants::REGISTRY_NAME,
            version = constants::VERSION,
            game_mint = %config.game_token_mint.short(),
            state_authority = config.state_authority.is_some(),
            fee_schedule = config.entry_fee_requirements.is_some(),
            "Lobby controller initialized"
        );
        Ok(Self {
            records: LobbyRecordStore::new(config.bounds.clone()),
            config,
            ledger,
            journal: OperationJournal::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Address of the lobby for `(owner, track_mint)`. Pure; the lobby need
    /// not exist.
    ///
    /// # Errors
    /// `InvalidDerivation` for default inputs.
    pub fn lobby_address(owner: &Address, track_mint: &Address) -> Result<Address> {
        derive_lobby_address(owner, track_mint)
    }

    /// The lobby record at `address`.
    ///
    /// # Errors
    /// `NotFound` if no lobby lives there.
    pub fn get(&self, address: &Address) -> Result<&LobbyRecord> {
        self.records.get(&self.ledger, address)
    }

    /// The lobby owned by `owner` for `track_mint`.
    ///
    /// # Errors
    /// `InvalidDerivation` for default inputs, `NotFound` if absent.
    pub fn find(&self, owner: &Address, track_mint: &Address) -> Result<&LobbyRecord> {
        self.get(&derive_lobby_address(owner, track_mint)?)
    }

    #[must_use]
    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable ledger access for token movements outside the lobby lifecycle.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    #[must_use]
    pub fn journal(&self) -> &OperationJournal {
        &self.journal
    }

    /// Check supply conservation for every issued mint.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` if any mint's balances drifted.
    pub fn verify_supply(&self) -> Result<()> {
        self.ledger.verify_all_supply()
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Create a lobby with empty game and track vaults.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidMetadata`, `InvalidDerivation`,
    /// `AlreadyExists`, `NotFound` (owner token account missing), or
    /// `VaultOwnershipMismatch`.
    pub fn create(&mut self, signers: &SignerSet, request: CreateLobby) -> Result<Address> {
        let CreateLobby {
            owner,
            authority,
            track_mint,
            track_metadata,
            lobby_data,
        } = request;

        self.authorize_create(signers, &owner, &authority)?;
        lobby_data.validate_with_fees(
            self.records.bounds(),
            self.config.entry_fee_requirements.as_ref(),
        )?;
        let lobby = derive_lobby_address(&owner, &track_mint)?;
        let game_mint = self.config.game_token_mint;
        if track_mint == game_mint {
            return Err(LobbyError::InvalidDerivation {
                reason: "track mint is the game token mint".into(),
            });
        }
        let created_at = Utc::now();
        let unlock_time = self.unlock_time(created_at)?;

        let records = &self.records;
        let (record, payload) = self.ledger.execute(|tx| {
            if tx.contains(&lobby) {
                return Err(LobbyError::AlreadyExists(lobby));
            }
            let owner_game_token = personal_account(tx, &owner, &game_mint)?;
            let owner_track_token = personal_account(tx, &owner, &track_mint)?;
            let lobby_game_token = vault::ensure_vault(tx, &lobby, &game_mint, &owner)?;
            let lobby_track_token = vault::ensure_vault(tx, &lobby, &track_mint, &owner)?;

            let record = LobbyRecord {
                owner,
                authority,
                track_keys: TrackKeys {
                    track_mint,
                    game_token_mint: game_mint,
                    track_metadata,
                    lobby_game_token,
                    lobby_track_token,
                    owner_game_token,
                    owner_track_token,
                },
                lobby_data,
                created_at,
                unlock_time,
            };
            let payload = serde_json::to_vec(&record)?;
            records.put(tx, lobby, record.clone())?;
            Ok((record, payload))
        })?;

        tracing::info!(
            lobby = %lobby.short(),
            owner = %owner.short(),
            authority = %authority.short(),
            name = %record.lobby_data.name,
            "Lobby created"
        );
        self.issue(ReceiptType::LobbyCreated, Some(lobby), owner, &payload);
        Ok(lobby)
    }

    fn authorize_create(
        &self,
        signers: &SignerSet,
        owner: &Address,
        authority: &Address,
    ) -> Result<()> {
        signers.require(owner, "owner")?;
        signers.require(authority, "authority")?;
        if owner == authority {
            tracing::warn!(owner = %owner.short(), "Create rejected: owner and authority coincide");
            return Err(LobbyError::unauthorized(
                "authority must be distinct from owner",
            ));
        }
        if let Some(expected) = self.config.state_authority {
            if *authority != expected {
                tracing::warn!(
                    authority = %authority.short(),
                    expected = %expected.short(),
                    "Create rejected: authority is not the state authority"
                );
                return Err(LobbyError::unauthorized(
                    "authority is not the configured state authority",
                ));
            }
        }
        Ok(())
    }

    fn unlock_time(&self, created_at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let Some(delay) = self.config.unlock_delay_secs else {
            return Ok(None);
        };
        i64::try_from(delay)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|delta| created_at.checked_add_signed(delta))
            .map(Some)
            .ok_or_else(|| {
                LobbyError::Configuration(format!("unlock delay {delay}s out of range"))
            })
    }

    // -----------------------------------------------------------------------
    // UpdateMetadata
    // -----------------------------------------------------------------------

    /// Replace a lobby's metadata. Nothing else in the record changes.
    ///
    /// # Errors
    /// `NotFound`, `Unauthorized`, or `InvalidMetadata`.
    pub fn update_metadata(
        &mut self,
        signers: &SignerSet,
        owner: &Address,
        track_mint: &Address,
        lobby_data: LobbyData,
    ) -> Result<()> {
        let lobby = derive_lobby_address(owner, track_mint)?;
        let mut record = self.get(&lobby)?.clone();
        signers.require(&record.owner, "owner")?;
        lobby_data.validate_with_fees(
            self.records.bounds(),
            self.config.entry_fee_requirements.as_ref(),
        )?;
        record.lobby_data = lobby_data;
        let payload = serde_json::to_vec(&record)?;

        let records = &self.records;
        self.ledger
            .execute(|tx| records.put(tx, lobby, record.clone()))?;

        tracing::info!(
            lobby = %lobby.short(),
            owner = %record.owner.short(),
            name = %record.lobby_data.name,
            "Lobby metadata updated"
        );
        self.issue(ReceiptType::LobbyUpdated, Some(lobby), record.owner, &payload);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Close
    // -----------------------------------------------------------------------

    /// Return both vault balances to the owner, close the vaults, and delete
    /// the record. The same `(owner, track_mint)` may be created again.
    ///
    /// # Errors
    /// `NotFound` (lobby or an owner destination account), `Unauthorized`,
    /// or token errors from draining.
    pub fn close(
        &mut self,
        signers: &SignerSet,
        owner: &Address,
        track_mint: &Address,
    ) -> Result<ClosedLobby> {
        let lobby = derive_lobby_address(owner, track_mint)?;
        let record = self.get(&lobby)?.clone();
        signers.require(&record.owner, "owner")?;

        let records = &self.records;
        let [game, track] = record.track_keys.vault_destinations();
        let (closed, payload) = self.ledger.execute(|tx| {
            let game_tokens_returned = vault::drain_and_close(tx, &lobby, &game.0, &game.1)?;
            let track_tokens_returned = vault::drain_and_close(tx, &lobby, &track.0, &track.1)?;
            records.delete(tx, &lobby)?;
            let closed = ClosedLobby {
                address: lobby,
                record,
                game_tokens_returned,
                track_tokens_returned,
            };
            let payload = serde_json::to_vec(&closed)?;
            Ok((closed, payload))
        })?;

        tracing::info!(
            lobby = %lobby.short(),
            owner = %closed.record.owner.short(),
            game_tokens_returned = closed.game_tokens_returned,
            track_tokens_returned = closed.track_tokens_returned,
            "Lobby closed"
        );
        self.issue(ReceiptType::LobbyClosed, Some(lobby), closed.record.owner, &payload);
        Ok(closed)
    }

    // -----------------------------------------------------------------------
    // SetEntryFeeRequirements
    // -----------------------------------------------------------------------

    /// Replace the entry fee schedule. Applies to later Create and
    /// UpdateMetadata calls; existing lobbies are not revalidated.
    ///
    /// # Errors
    /// `Unauthorized` unless the configured state authority signed (or if
    /// none is configured), `InvalidFeeRequirements` for a malformed schedule.
    pub fn set_entry_fee_requirements(
        &mut self,
        signers: &SignerSet,
        requirements: EntryFeeRequirements,
    ) -> Result<()> {
        let Some(state_authority) = self.config.state_authority else {
            tracing::warn!("Fee schedule change rejected: no state authority configured");
            return Err(LobbyError::unauthorized("no state authority configured"));
        };
        signers.require(&state_authority, "state authority")?;
        requirements.validate()?;
        let payload = serde_json::to_vec(&requirements)?;

        tracing::info!(
            min_fee = requirements.min_fee,
            max_fee = requirements.max_class_fees[requirements.max_class_fees.len() - 1],
            "Entry fee requirements set"
        );
        self.issue(
            ReceiptType::FeeRequirementsSet,
            None,
            state_authority,
            &payload,
        );
        self.config.entry_fee_requirements = Some(requirements);
        Ok(())
    }

    fn issue(
        &mut self,
        kind: ReceiptType,
        lobby: Option<Address>,
        actor: Address,
        payload: &[u8],
    ) {
        self.journal
            .append(OperationReceipt::new(kind, lobby, actor, payload));
    }
}

/// The owner's personal token account for `mint`, verified in place.
fn personal_account(tx: &Transaction<'_>, owner: &Address, mint: &Address) -> Result<Address> {
    let address = derive_token_address(owner, mint)?;
    let account = tx.token_account(&address)?;
    if !account.is_held_by(owner, mint) {
        tracing::warn!(
            account = %address.short(),
            owner = %owner.short(),
            "Owner token account held by another identity or mint"
        );
        return Err(LobbyError::VaultOwnershipMismatch {
            address,
            reason: format!("not {owner}'s account for mint {mint}"),
        });
    }
    Ok(address)
}
