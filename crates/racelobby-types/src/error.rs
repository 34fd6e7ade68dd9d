//! Error types for the RaceLobby registry.
//!
//! All errors use the `RL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Lobby lifecycle errors (authorization, existence, validation)
//! - 2xx: Token / vault balance errors
//! - 3xx: Fee schedule and supply errors
//! - 9xx: General / internal errors
//!
//! Every error is terminal: the operation that produced it has no effect.

use thiserror::Error;

use crate::Address;

/// Central error enum for all RaceLobby operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    // =================================================================
    // Lifecycle Errors (1xx)
    // =================================================================
    /// The signer set does not contain a required identity.
    #[error("RL_ERR_100: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// No record or account exists at the address.
    #[error("RL_ERR_101: Account not found: {0}")]
    NotFound(Address),

    /// An account already exists at the address Create targets.
    #[error("RL_ERR_102: Account already exists: {0}")]
    AlreadyExists(Address),

    /// Lobby metadata violates a range, length, or enum constraint.
    #[error("RL_ERR_103: Invalid lobby metadata: {reason}")]
    InvalidMetadata { reason: String },

    /// A derived address is occupied by an incompatible account.
    #[error("RL_ERR_104: Vault ownership mismatch at {address}: {reason}")]
    VaultOwnershipMismatch { address: Address, reason: String },

    /// Derivation inputs are malformed.
    #[error("RL_ERR_105: Invalid derivation: {reason}")]
    InvalidDerivation { reason: String },

    // =================================================================
    // Token Errors (2xx)
    // =================================================================
    /// A transfer exceeds the source account balance.
    #[error("RL_ERR_200: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Source and destination hold different mints.
    #[error("RL_ERR_201: Mint mismatch: expected {expected}, got {actual}")]
    MintMismatch { expected: Address, actual: Address },

    /// A token account cannot be closed while it holds a balance.
    #[error("RL_ERR_202: Account {address} not empty: {amount} remaining")]
    AccountNotEmpty { address: Address, amount: u64 },

    /// A balance would exceed `u64::MAX`.
    #[error("RL_ERR_203: Arithmetic overflow")]
    ArithmeticOverflow,

    // =================================================================
    // Fee / Supply Errors (3xx)
    // =================================================================
    /// The entry fee schedule is malformed.
    #[error("RL_ERR_300: Invalid entry fee requirements: {reason}")]
    InvalidFeeRequirements { reason: String },

    /// Supply conservation invariant violated. Critical.
    #[error("RL_ERR_301: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid bounds, missing mint, etc.).
    #[error("RL_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("RL_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl LobbyError {
    /// Shorthand for [`LobbyError::Unauthorized`].
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`LobbyError::InvalidMetadata`].
    pub fn invalid_metadata(reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            reason: reason.into(),
        }
    }

    /// Numeric code embedded in the display string.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 100,
            Self::NotFound(_) => 101,
            Self::AlreadyExists(_) => 102,
            Self::InvalidMetadata { .. } => 103,
            Self::VaultOwnershipMismatch { .. } => 104,
            Self::InvalidDerivation { .. } => 105,
            Self::InsufficientFunds { .. } => 200,
            Self::MintMismatch { .. } => 201,
            Self::AccountNotEmpty { .. } => 202,
            Self::ArithmeticOverflow => 203,
            Self::InvalidFeeRequirements { .. } => 300,
            Self::SupplyInvariantViolation { .. } => 301,
            Self::Configuration(_) => 900,
            Self::Serialization(_) => 901,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LobbyError>;

impl From<serde_json::Error> for LobbyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
