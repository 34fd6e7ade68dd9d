//! Operation receipts for the RaceLobby audit trail.
//!
//! Every committed operation (lobby created, updated, closed; fee schedule
//! set) produces a [`OperationReceipt`] carrying a SHA-256 digest of its
//! canonical payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, ReceiptId, constants::RECEIPT_SEED};

/// The type of operation this receipt records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptType {
    /// A lobby record and its vaults were created.
    LobbyCreated,
    /// A lobby's metadata was replaced.
    LobbyUpdated,
    /// A lobby's vaults were drained and the record deleted.
    LobbyClosed,
    /// The entry fee schedule was replaced.
    FeeRequirementsSet,
}

impl std::fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LobbyCreated => write!(f, "LOBBY_CREATED"),
            Self::LobbyUpdated => write!(f, "LOBBY_UPDATED"),
            Self::LobbyClosed => write!(f, "LOBBY_CLOSED"),
            Self::FeeRequirementsSet => write!(f, "FEE_REQUIREMENTS_SET"),
        }
    }
}

/// Record that an operation committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationReceipt {
    pub id: ReceiptId,
    pub receipt_type: ReceiptType,
    /// Lobby the operation touched, if any.
    pub lobby: Option<Address>,
    /// Identity that performed the operation.
    pub actor: Address,
    /// SHA-256 over the domain tag, type, lobby, actor and payload.
    pub payload_hash: [u8; 32],
    pub issued_at: DateTime<Utc>,
}

impl OperationReceipt {
    #[must_use]
    pub fn new(
        receipt_type: ReceiptType,
        lobby: Option<Address>,
        actor: Address,
        payload: &[u8],
    ) -> Self {
        Self {
            id: ReceiptId::new(),
            receipt_type,
            lobby,
            actor,
            payload_hash: Self::compute_hash(receipt_type, lobby.as_ref(), &actor, payload),
            issued_at: Utc::now(),
        }
    }

    /// Deterministic digest of a receipt's content.
    #[must_use]
    pub fn compute_hash(
        receipt_type: ReceiptType,
        lobby: Option<&Address>,
        actor: &Address,
        payload: &[u8],
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(RECEIPT_SEED);
        hasher.update(receipt_type.to_string().as_bytes());
        hasher.update(lobby.map_or([0u8; 32], |a| a.0));
        hasher.update(actor.0);
        hasher.update((payload.len() as u64).to_le_bytes());
        hasher.update(payload);
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Recompute the digest from `payload` and compare.
    #[must_use]
    pub fn verify(&self, payload: &[u8]) -> bool {
        Self::compute_hash(self.receipt_type, self.lobby.as_ref(), &self.actor, payload)
            == self.payload_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_type_display() {
        assert_eq!(format!("{}", ReceiptType::LobbyCreated), "LOBBY_CREATED");
        assert_eq!(format!("{}", ReceiptType::LobbyClosed), "LOBBY_CLOSED");
        assert_eq!(
            format!("{}", ReceiptType::FeeRequirementsSet),
            "FEE_REQUIREMENTS_SET"
        );
    }

    #[test]
    fn receipt_verifies_its_payload() {
        let r = OperationReceipt::new(
            ReceiptType::LobbyUpdated,
            Some(Address([1; 32])),
            Address([2; 32]),
            b"payload",
        );
        assert!(r.verify(b"payload"));
        assert!(!r.verify(b"tampered"));
    }

    #[test]
    fn hash_depends_on_type_and_lobby() {
        let actor = Address([2; 32]);
        let a = OperationReceipt::compute_hash(ReceiptType::LobbyCreated, None, &actor, b"x");
        let b = OperationReceipt::compute_hash(ReceiptType::LobbyClosed, None, &actor, b"x");
        let c = OperationReceipt::compute_hash(
            ReceiptType::LobbyCreated,
            Some(&Address([1; 32])),
            &actor,
            b"x",
        );
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
