//! Settlement records.
//!
//! A [`Transaction`] is the immutable record of an accepted offer: who paid
//! whom, for which item, at what agreed price, and what the item's listed
//! price was at that moment. Created exactly once per accepted offer, never
//! mutated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ItemId, Money, OfferId, TransactionId, UserId};

/// An immutable settlement record produced by offer acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub item_id: ItemId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    /// The offer this settlement executed. One transaction per offer, ever.
    pub offer_id: OfferId,
    /// The agreed offer price actually moved between balances.
    pub amount: Money,
    /// The item's listed price at settlement time, preserved for audit even
    /// though the item's price may later change.
    pub original_price: Money,
    pub executed_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a settlement record.
    #[must_use]
    pub fn new(
        item_id: ItemId,
        buyer_id: UserId,
        seller_id: UserId,
        offer_id: OfferId,
        amount: Money,
        original_price: Money,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            item_id,
            buyer_id,
            seller_id,
            offer_id,
            amount,
            original_price,
            executed_at: Utc::now(),
        }
    }

    /// SHA-256 integrity digest over the canonical fields, hex-encoded.
    ///
    /// The digest covers everything that makes the settlement what it is;
    /// two records differing in any field produce different digests.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"openmart:transaction:v1:");
        hasher.update(self.id.0.as_bytes());
        hasher.update(self.item_id.0.as_bytes());
        hasher.update(self.buyer_id.0.as_bytes());
        hasher.update(self.seller_id.0.as_bytes());
        hasher.update(self.offer_id.0.as_bytes());
        hasher.update(self.amount.minor_units().to_le_bytes());
        hasher.update(self.original_price.minor_units().to_le_bytes());
        hasher.update(self.executed_at.timestamp_micros().to_le_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transaction[{}] item {} {} -> {} for {}",
            self.id, self.item_id, self.seller_id, self.buyer_id, self.amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_transaction() -> Transaction {
        Transaction::new(
            ItemId::new(),
            UserId::new(),
            UserId::new(),
            OfferId::new(),
            Money::from_minor_units(10_000).unwrap(),
            Money::from_minor_units(12_000).unwrap(),
        )
    }

    #[test]
    fn digest_is_stable() {
        let tx = make_transaction();
        assert_eq!(tx.digest(), tx.digest());
        assert_eq!(tx.digest().len(), 64);
    }

    #[test]
    fn digest_differs_per_record() {
        let a = make_transaction();
        let b = make_transaction();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn digest_covers_amount() {
        let mut a = make_transaction();
        let before = a.digest();
        a.amount = Money::from_minor_units(9_999).unwrap();
        assert_ne!(before, a.digest());
    }

    #[test]
    fn transaction_display() {
        let tx = make_transaction();
        let s = format!("{tx}");
        assert!(s.contains("Transaction["));
        assert!(s.contains("100.00"));
    }

    #[test]
    fn transaction_serde_roundtrip() {
        let tx = make_transaction();
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }
}
