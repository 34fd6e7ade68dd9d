//! System-wide constants for the RaceLobby registry.

/// Domain tag mixed into every lobby address derivation.
pub const LOBBY_SEED: &[u8] = b"racelobby:lobby:v1:";

/// Domain tag mixed into every personal token account address derivation.
pub const TOKEN_ACCOUNT_SEED: &[u8] = b"racelobby:token:v1:";

/// Domain tag mixed into every lobby vault address derivation.
pub const VAULT_SEED: &[u8] = b"racelobby:vault:v1:";

/// Domain tag for operation receipt payload hashes.
pub const RECEIPT_SEED: &[u8] = b"racelobby:receipt:v1:";

/// Domain tag for signed operation messages.
pub const OPERATION_MESSAGE_SEED: &[u8] = b"racelobby:op:v1:";

/// Minimum lobby name length in bytes.
pub const MIN_NAME_LEN: usize = 5;

/// Maximum lobby name length in bytes (fixed record layout).
pub const MAX_NAME_LEN: usize = 32;

/// Minimum lobby location length in bytes.
pub const MIN_LOCATION_LEN: usize = 5;

/// Maximum lobby location length in bytes (fixed record layout).
pub const MAX_LOCATION_LEN: usize = 32;

/// Lowest racer class a lobby may require.
pub const MIN_CLASS: u8 = 1;

/// Highest racer class a lobby may require.
pub const MAX_CLASS: u8 = 5;

/// Number of racer classes with their own entry fee ceiling.
pub const CLASS_COUNT: usize = 5;

/// Maximum number of laps in a race.
pub const MAX_TOTAL_LAPS: u8 = 4;

/// Unlock delay applied when a deployment opts into one (24 hours).
pub const DEFAULT_UNLOCK_DELAY_SECS: u64 = 60 * 60 * 24;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registry name.
pub const REGISTRY_NAME: &str = "RaceLobby";
