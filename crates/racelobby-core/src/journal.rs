//! Append-only journal of committed operations.

use racelobby_types::{Address, OperationReceipt, ReceiptType};

/// Receipts in commit order. Entries are never removed or rewritten.
#[derive(Debug, Default)]
pub struct OperationJournal {
    receipts: Vec<OperationReceipt>,
}

impl OperationJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a receipt and return a reference to it.
    pub fn append(&mut self, receipt: OperationReceipt) -> &OperationReceipt {
        tracing::debug!(
            receipt = %receipt.id,
            kind = %receipt.receipt_type,
            actor = %receipt.actor.short(),
            "Receipt recorded"
        );
        self.receipts.push(receipt);
        &self.receipts[self.receipts.len() - 1]
    }

    #[must_use]
    pub fn receipts(&self) -> &[OperationReceipt] {
        &self.receipts
    }

    #[must_use]
    pub fn last(&self) -> Option<&OperationReceipt> {
        self.receipts.last()
    }

    /// Receipts that touched `lobby`, oldest first.
    pub fn for_lobby<'a>(&'a self, lobby: &'a Address) -> impl Iterator<Item = &'a OperationReceipt> {
        self.receipts
            .iter()
            .filter(move |r| r.lobby.as_ref() == Some(lobby))
    }

    /// Number of receipts of `kind`.
    #[must_use]
    pub fn count(&self, kind: ReceiptType) -> usize {
        self.receipts
            .iter()
            .filter(|r| r.receipt_type == kind)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
