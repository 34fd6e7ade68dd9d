//! Configuration types for a RaceLobby deployment.

use serde::{Deserialize, Serialize};

use crate::{Address, EntryFeeRequirements, LobbyError, Result, constants};

/// Schema limits applied to every lobby metadata write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBounds {
    /// Minimum name length in bytes.
    pub min_name_len: usize,
    /// Maximum name length in bytes.
    pub max_name_len: usize,
    /// Minimum location length in bytes.
    pub min_location_len: usize,
    /// Maximum location length in bytes.
    pub max_location_len: usize,
    /// Lowest allowed `min_class`.
    pub min_class: u8,
    /// Highest allowed `min_class`.
    pub max_class: u8,
    /// Highest allowed `total_laps` (the lowest is always 1).
    pub max_total_laps: u8,
}

impl Default for MetadataBounds {
    fn default() -> Self {
        Self {
            min_name_len: constants::MIN_NAME_LEN,
            max_name_len: constants::MAX_NAME_LEN,
            min_location_len: constants::MIN_LOCATION_LEN,
            max_location_len: constants::MAX_LOCATION_LEN,
            min_class: constants::MIN_CLASS,
            max_class: constants::MAX_CLASS,
            max_total_laps: constants::MAX_TOTAL_LAPS,
        }
    }
}

impl MetadataBounds {
    /// Reject inverted or empty ranges.
    ///
    /// # Errors
    /// Returns `Configuration` describing the first bad range.
    pub fn validate(&self) -> Result<()> {
        if self.min_name_len == 0 || self.min_name_len > self.max_name_len {
            return Err(LobbyError::Configuration(format!(
                "name length range {}..={} is empty",
                self.min_name_len, self.max_name_len
            )));
        }
        if self.min_location_len == 0 || self.min_location_len > self.max_location_len {
            return Err(LobbyError::Configuration(format!(
                "location length range {}..={} is empty",
                self.min_location_len, self.max_location_len
            )));
        }
        if self.min_class == 0 || self.min_class > self.max_class {
            return Err(LobbyError::Configuration(format!(
                "class range {}..={} is empty",
                self.min_class, self.max_class
            )));
        }
        if self.max_total_laps == 0 {
            return Err(LobbyError::Configuration(
                "max_total_laps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a lobby registry deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Mint of the fungible game token escrowed by every lobby.
    pub game_token_mint: Address,
    /// When set, the only identity accepted as a lobby's co-signing authority,
    /// and the identity allowed to change the entry fee schedule.
    #[serde(default)]
    pub state_authority: Option<Address>,
    /// Seconds after creation stamped into a record's `unlock_time`.
    #[serde(default)]
    pub unlock_delay_secs: Option<u64>,
    /// Schema limits for lobby metadata.
    #[serde(default)]
    pub bounds: MetadataBounds,
    /// Entry fee schedule for the game token, if any.
    #[serde(default)]
    pub entry_fee_requirements: Option<EntryFeeRequirements>,
}

impl LobbyConfig {
    /// Minimal configuration: default bounds, no state authority, no fee schedule.
    #[must_use]
    pub fn new(game_token_mint: Address) -> Self {
        Self {
            game_token_mint,
            state_authority: None,
            unlock_delay_secs: None,
            bounds: MetadataBounds::default(),
            entry_fee_requirements: None,
        }
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `Configuration` for invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if the game mint or state authority is the
    /// default address, bounds are inverted, or the fee schedule is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.game_token_mint.is_default() {
            return Err(LobbyError::Configuration(
                "game_token_mint must not be the default address".into(),
            ));
        }
        if self.state_authority.is_some_and(|a| a.is_default()) {
            return Err(LobbyError::Configuration(
                "state_authority must not be the default address".into(),
            ));
        }
        self.bounds.validate()?;
        if let Some(fees) = &self.entry_fee_requirements {
            fees.validate()
                .map_err(|e| LobbyError::Configuration(e.to_string()))?;
        }
        Ok(())
    }
}
