//! Lobby record model.
//!
//! A [`LobbyRecord`] is persisted at an address derived from its owner and
//! track mint. It references two escrow vaults owned by that address and
//! carries mutable [`LobbyData`] that is validated on every write.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, EntryFeeRequirements, LobbyError, MetadataBounds, Result};

// ---------------------------------------------------------------------------
// TrackType
// ---------------------------------------------------------------------------

/// Surface of the race track. Closed set; unknown tags are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Dirt,
    Space,
    Pavement,
    Sand,
}

impl TrackType {
    /// All track types, in tag order.
    pub const ALL: [Self; 4] = [Self::Dirt, Self::Space, Self::Pavement, Self::Sand];

    /// Decode a wire tag.
    ///
    /// # Errors
    /// Returns `InvalidMetadata` for an unrecognized tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or_else(|| LobbyError::invalid_metadata(format!("unknown track type tag {tag}")))
    }

    /// Wire tag of this track type.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Dirt => 0,
            Self::Space => 1,
            Self::Pavement => 2,
            Self::Sand => 3,
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dirt => write!(f, "dirt"),
            Self::Space => write!(f, "space"),
            Self::Pavement => write!(f, "pavement"),
            Self::Sand => write!(f, "sand"),
        }
    }
}

impl FromStr for TrackType {
    type Err = LobbyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| LobbyError::invalid_metadata(format!("unknown track type `{s}`")))
    }
}

// ---------------------------------------------------------------------------
// LobbyData
// ---------------------------------------------------------------------------

/// Mutable lobby metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyData {
    pub name: String,
    pub location: String,
    /// Entry fee in the smallest game-token unit.
    pub entry_fee: u64,
    /// Lowest racer class admitted.
    pub min_class: u8,
    pub total_laps: u8,
    pub track_type: TrackType,
}

impl LobbyData {
    /// Decode client-supplied JSON metadata.
    ///
    /// # Errors
    /// Returns `InvalidMetadata` for unknown track types, missing fields, or
    /// out-of-range integers.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LobbyError::invalid_metadata(e.to_string()))
    }

    /// Check every schema constraint.
    ///
    /// # Errors
    /// Returns `InvalidMetadata` naming the first violated constraint.
    pub fn validate(&self, bounds: &MetadataBounds) -> Result<()> {
        check_len("name", &self.name, bounds.min_name_len, bounds.max_name_len)?;
        check_len(
            "location",
            &self.location,
            bounds.min_location_len,
            bounds.max_location_len,
        )?;
        if self.min_class < bounds.min_class || self.min_class > bounds.max_class {
            return Err(LobbyError::invalid_metadata(format!(
                "min_class {} outside {}..={}",
                self.min_class, bounds.min_class, bounds.max_class
            )));
        }
        if self.total_laps == 0 || self.total_laps > bounds.max_total_laps {
            return Err(LobbyError::invalid_metadata(format!(
                "total_laps {} outside 1..={}",
                self.total_laps, bounds.max_total_laps
            )));
        }
        Ok(())
    }

    /// Schema check plus the entry fee schedule, when one is configured.
    ///
    /// # Errors
    /// Returns `InvalidMetadata` on any violation.
    pub fn validate_with_fees(
        &self,
        bounds: &MetadataBounds,
        fees: Option<&EntryFeeRequirements>,
    ) -> Result<()> {
        self.validate(bounds)?;
        if let Some(fees) = fees {
            fees.check_fee(self.min_class, self.entry_fee)?;
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.len();
    if len < min || len > max {
        return Err(LobbyError::invalid_metadata(format!(
            "{field} length {len} outside {min}..={max}"
        )));
    }
    Ok(())
}

/// Sample metadata for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl LobbyData {
    /// The "ChillThrill" sand lobby.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            name: "ChillThrill".to_string(),
            location: "Solana Beach".to_string(),
            entry_fee: 120,
            min_class: 3,
            total_laps: 4,
            track_type: TrackType::Sand,
        }
    }

    /// The updated "ChillThrill New" pavement lobby.
    #[must_use]
    pub fn sample_update() -> Self {
        Self {
            name: "ChillThrill New".to_string(),
            location: "Solana Heaven".to_string(),
            entry_fee: 150,
            min_class: 4,
            total_laps: 4,
            track_type: TrackType::Pavement,
        }
    }
}

// ---------------------------------------------------------------------------
// TrackKeys
// ---------------------------------------------------------------------------

/// Addresses tying a lobby to its track asset and token accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackKeys {
    pub track_mint: Address,
    pub game_token_mint: Address,
    /// Metadata-registry address of the track asset. Opaque.
    pub track_metadata: Address,
    /// Game token vault owned by the lobby.
    pub lobby_game_token: Address,
    /// Track token vault owned by the lobby.
    pub lobby_track_token: Address,
    /// Owner's personal game token account.
    pub owner_game_token: Address,
    /// Owner's personal track token account.
    pub owner_track_token: Address,
}

impl TrackKeys {
    /// `(vault, owner destination)` pairs drained at teardown.
    #[must_use]
    pub fn vault_destinations(&self) -> [(Address, Address); 2] {
        [
            (self.lobby_game_token, self.owner_game_token),
            (self.lobby_track_token, self.owner_track_token),
        ]
    }
}

// ---------------------------------------------------------------------------
// LobbyRecord
// ---------------------------------------------------------------------------

/// The persisted lobby entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyRecord {
    /// Track holder. Sole identity allowed to update or close.
    pub owner: Address,
    /// State authority that co-signed creation. Immutable.
    pub authority: Address,
    pub track_keys: TrackKeys,
    pub lobby_data: LobbyData,
    pub created_at: DateTime<Utc>,
    /// Reserved. Stamped at creation when a delay is configured; not enforced.
    pub unlock_time: Option<DateTime<Utc>>,
}

impl LobbyRecord {
    /// Check the record is fit to persist.
    ///
    /// # Errors
    /// Returns `InvalidMetadata` for bad metadata or a default owner/authority.
    pub fn validate(&self, bounds: &MetadataBounds) -> Result<()> {
        if self.owner.is_default() || self.authority.is_default() {
            return Err(LobbyError::invalid_metadata(
                "owner and authority must be set",
            ));
        }
        self.lobby_data.validate(bounds)
    }

    #[must_use]
    pub fn is_owner(&self, identity: &Address) -> bool {
        self.owner == *identity
    }
}
