//! Item (digital good) model.
//!
//! `creator_id` is immutable once set; `current_owner_id` changes only
//! through settlement, never through a direct edit. An item cannot be
//! deleted while any offer or transaction references it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, Money, UserId};

/// A digital good listed on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    /// The user who created the item. Never changes.
    pub creator_id: UserId,
    /// The current owner. Changes only when an offer settles.
    pub current_owner_id: UserId,
    pub title: String,
    pub image_url: Option<String>,
    /// The listed asking price. Offers may be above or below it.
    pub price: Money,
    pub is_listed: bool,
    /// Free-form descriptive payload.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item owned by its creator.
    #[must_use]
    pub fn new(
        creator_id: UserId,
        title: String,
        image_url: Option<String>,
        price: Money,
        is_listed: bool,
        metadata: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            creator_id,
            current_owner_id: creator_id,
            title,
            image_url,
            price,
            is_listed,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.current_owner_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Item {
    #[must_use]
    pub fn dummy_listed(owner: UserId, price: Money) -> Self {
        Self::new(
            owner,
            "test item".to_string(),
            None,
            price,
            true,
            serde_json::Value::Null,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_is_initial_owner() {
        let creator = UserId::new();
        let item = Item::dummy_listed(creator, Money::from_minor_units(10_000).unwrap());
        assert_eq!(item.creator_id, creator);
        assert!(item.is_owned_by(creator));
        assert!(item.is_listed);
    }

    #[test]
    fn item_serde_roundtrip_with_metadata() {
        let mut item = Item::dummy_listed(UserId::new(), Money::from_minor_units(500).unwrap());
        item.metadata = serde_json::json!({"format": "png", "pixels": [32, 32]});
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
