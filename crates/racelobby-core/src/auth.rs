//! Signer sets: the identities that authorized a call.
//!
//! The controller only asks whether an identity is present. Signature
//! checking happens once, at the boundary, in [`SignerSet::from_signatures`]:
//! a pair whose signature does not verify over the operation message never
//! enters the set.

use std::collections::BTreeSet;

use ed25519_dalek::{Signature, VerifyingKey};
use racelobby_types::{Address, LobbyError, ReceiptType, Result, constants::OPERATION_MESSAGE_SEED};
use sha2::{Digest, Sha256};

/// Canonical message an identity signs to authorize an operation of `kind`
/// on `target` (a lobby address, or the game mint for fee changes).
#[must_use]
pub fn operation_message(kind: ReceiptType, target: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(OPERATION_MESSAGE_SEED);
    hasher.update(kind.to_string().as_bytes());
    hasher.update(target.as_bytes());
    let result = hasher.finalize();
    let mut message = [0u8; 32];
    message.copy_from_slice(&result);
    message
}

/// Identities that signed the current call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerSet {
    signers: BTreeSet<Address>,
}

impl SignerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from `(key, signature)` pairs over `message`, keeping
    /// only the pairs that verify.
    #[must_use]
    pub fn from_signatures(message: &[u8], signatures: &[(VerifyingKey, Signature)]) -> Self {
        let mut set = Self::new();
        for (key, signature) in signatures {
            let signer = Address::from_verifying_key(key);
            if key.verify_strict(message, signature).is_ok() {
                set.insert(signer);
            } else {
                tracing::warn!(signer = %signer.short(), "Dropping signer with invalid signature");
            }
        }
        set
    }

    pub fn insert(&mut self, signer: Address) -> bool {
        self.signers.insert(signer)
    }

    #[must_use]
    pub fn contains(&self, identity: &Address) -> bool {
        self.signers.contains(identity)
    }

    /// Require `identity` to have signed, naming its `role` in the error.
    ///
    /// # Errors
    /// `Unauthorized` if `identity` is absent.
    pub fn require(&self, identity: &Address, role: &str) -> Result<()> {
        if self.contains(identity) {
            return Ok(());
        }
        tracing::warn!(
            identity = %identity.short(),
            role,
            signers = self.signers.len(),
            "Required signature missing"
        );
        Err(LobbyError::unauthorized(format!(
            "missing {role} signature from {identity}"
        )))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl FromIterator<Address> for SignerSet {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            signers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;

    use super::*;

    #[test]
    fn require_present_and_missing() {
        let owner = Address::new_unique();
        let set: SignerSet = [owner].into_iter().collect();
        assert!(set.require(&owner, "owner").is_ok());
        let err = set.require(&Address::new_unique(), "authority").unwrap_err();
        assert!(matches!(err, LobbyError::Unauthorized { .. }));
        assert!(err.to_string().contains("authority"), "Got: {err}");
    }

    #[test]
    fn from_signatures_keeps_valid_pairs_only() {
        let good = SigningKey::generate(&mut OsRng);
        let bad = SigningKey::generate(&mut OsRng);
        let target = Address::new_unique();
        let message = operation_message(ReceiptType::LobbyCreated, &target);
        let other = operation_message(ReceiptType::LobbyClosed, &target);

        let set = SignerSet::from_signatures(
            &message,
            &[
                (good.verifying_key(), good.sign(&message)),
                (bad.verifying_key(), bad.sign(&other)),
            ],
        );
        assert_eq!(set.len(), 1);
        assert!(set.contains(&Address::from_verifying_key(&good.verifying_key())));
        assert!(!set.contains(&Address::from_verifying_key(&bad.verifying_key())));
    }

    #[test]
    fn messages_bind_kind_and_target() {
        let a = Address([1; 32]);
        let b = Address([2; 32]);
        assert_eq!(
            operation_message(ReceiptType::LobbyUpdated, &a),
            operation_message(ReceiptType::LobbyUpdated, &a)
        );
        assert_ne!(
            operation_message(ReceiptType::LobbyUpdated, &a),
            operation_message(ReceiptType::LobbyClosed, &a)
        );
        assert_ne!(
            operation_message(ReceiptType::LobbyUpdated, &a),
            operation_message(ReceiptType::LobbyUpdated, &b)
        );
    }

    #[test]
    fn empty_set() {
        let set = SignerSet::new();
        assert!(set.is_empty());
        assert!(set.require(&Address([1; 32]), "owner").is_err());
    }
}
