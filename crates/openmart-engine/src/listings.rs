//! Item listings: creation, owner edits, deletion, and queries.
//!
//! Ownership never changes through an edit — only settlement moves
//! `current_owner_id`. Deletion is refused while any offer or transaction
//! references the item.

use openmart_types::{Item, ItemId, MarketError, Money, Result, UserId};

use crate::{ItemFilter, Marketplace};

/// Input for creating an item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub title: String,
    pub image_url: Option<String>,
    pub price: Money,
    pub is_listed: bool,
    pub metadata: serde_json::Value,
}

impl ItemDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, price: Money) -> Self {
        Self {
            title: title.into(),
            image_url: None,
            price,
            is_listed: true,
            metadata: serde_json::Value::Null,
        }
    }
}

/// Partial update for an item. Unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Money>,
    pub is_listed: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}

impl Marketplace {
    /// Create an item owned by its creator.
    ///
    /// # Errors
    /// [`MarketError::UserNotFound`] for an unregistered creator;
    /// [`MarketError::InvalidAmount`] for out-of-bounds title/URL/price.
    pub fn create_item(&self, creator: UserId, draft: ItemDraft) -> Result<Item> {
        self.check_item_limits(&draft.title, draft.image_url.as_deref(), draft.price)?;
        self.store().transaction(|tables| {
            tables.user(creator)?;
            let item = Item::new(
                creator,
                draft.title,
                draft.image_url,
                draft.price,
                draft.is_listed,
                draft.metadata,
            );
            tables.insert_item(item.clone())?;
            Ok(item)
        })
    }

    /// Apply an owner edit. Creator and owner fields are not editable.
    ///
    /// # Errors
    /// [`MarketError::NotAuthorized`] unless the actor currently owns the
    /// item; limit violations as in [`Marketplace::create_item`].
    pub fn update_item(&self, actor: UserId, item_id: ItemId, patch: ItemPatch) -> Result<Item> {
        if let Some(title) = &patch.title {
            self.check_title(title)?;
        }
        if let Some(url) = &patch.image_url {
            self.check_image_url(url)?;
        }
        if let Some(price) = patch.price {
            self.check_price(price)?;
        }
        self.store().transaction(|tables| {
            let item = tables.item_mut(item_id)?;
            if !item.is_owned_by(actor) {
                return Err(MarketError::NotAuthorized {
                    reason: "only the item owner can edit it",
                });
            }
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(url) = patch.image_url {
                item.image_url = Some(url);
            }
            if let Some(price) = patch.price {
                item.price = price;
            }
            if let Some(is_listed) = patch.is_listed {
                item.is_listed = is_listed;
            }
            if let Some(metadata) = patch.metadata {
                item.metadata = metadata;
            }
            item.touch();
            Ok(item.clone())
        })
    }

    /// Delete an item the actor owns.
    ///
    /// # Errors
    /// [`MarketError::NotAuthorized`] for non-owners;
    /// [`MarketError::ItemInUse`] while offers or transactions reference it.
    pub fn delete_item(&self, actor: UserId, item_id: ItemId) -> Result<()> {
        self.store().transaction(|tables| {
            let item = tables.item(item_id)?;
            if !item.is_owned_by(actor) {
                return Err(MarketError::NotAuthorized {
                    reason: "only the item owner can delete it",
                });
            }
            tables.remove_item(item_id)?;
            Ok(())
        })
    }

    /// Fetch an item. Items are public; no actor required.
    ///
    /// # Errors
    /// [`MarketError::ItemNotFound`].
    pub fn get_item(&self, item_id: ItemId) -> Result<Item> {
        self.store()
            .read(|tables| tables.item(item_id).cloned())
    }

    /// Items matching the filter, newest first.
    #[must_use]
    pub fn list_items(&self, filter: ItemFilter) -> Vec<Item> {
        self.store().read(|tables| tables.items_matching(filter))
    }

    fn check_item_limits(
        &self,
        title: &str,
        image_url: Option<&str>,
        price: Money,
    ) -> Result<()> {
        self.check_title(title)?;
        if let Some(url) = image_url {
            self.check_image_url(url)?;
        }
        self.check_price(price)
    }

    fn check_title(&self, title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(MarketError::InvalidAmount {
                reason: "item title must not be empty".to_string(),
            });
        }
        if title.chars().count() > self.config().max_title_len {
            return Err(MarketError::InvalidAmount {
                reason: format!(
                    "item title exceeds {} characters",
                    self.config().max_title_len
                ),
            });
        }
        Ok(())
    }

    fn check_image_url(&self, url: &str) -> Result<()> {
        if url.chars().count() > self.config().max_image_url_len {
            return Err(MarketError::InvalidAmount {
                reason: format!(
                    "image URL exceeds {} characters",
                    self.config().max_image_url_len
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn check_price(&self, price: Money) -> Result<()> {
        if price > self.config().max_price {
            return Err(MarketError::InvalidAmount {
                reason: format!("price {price} exceeds the maximum {}", self.config().max_price),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use openmart_store::Store;

    use super::*;

    fn money(minor: i64) -> Money {
        Money::from_minor_units(minor).unwrap()
    }

    fn marketplace() -> Marketplace {
        Marketplace::new(Arc::new(Store::new()))
    }

    #[test]
    fn create_and_fetch_item() {
        let market = marketplace();
        let owner = market.register_user("owner@example.test").unwrap();
        let mut draft = ItemDraft::new("pixel dragon", money(10_000));
        draft.metadata = serde_json::json!({"format": "png"});
        let item = market.create_item(owner.id, draft).unwrap();

        let fetched = market.get_item(item.id).unwrap();
        assert_eq!(fetched, item);
        assert_eq!(fetched.creator_id, owner.id);
        assert_eq!(fetched.current_owner_id, owner.id);
    }

    #[test]
    fn empty_title_rejected() {
        let market = marketplace();
        let owner = market.register_user("owner@example.test").unwrap();
        let err = market
            .create_item(owner.id, ItemDraft::new("   ", money(100)))
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidAmount { .. }));
    }

    #[test]
    fn oversized_title_rejected() {
        let market = marketplace();
        let owner = market.register_user("owner@example.test").unwrap();
        let err = market
            .create_item(owner.id, ItemDraft::new("x".repeat(256), money(100)))
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidAmount { .. }));
    }

    #[test]
    fn update_requires_ownership() {
        let market = marketplace();
        let owner = market.register_user("owner@example.test").unwrap();
        let stranger = market.register_user("stranger@example.test").unwrap();
        let item = market
            .create_item(owner.id, ItemDraft::new("orb", money(500)))
            .unwrap();

        let patch = ItemPatch {
            price: Some(money(600)),
            ..ItemPatch::default()
        };
        let err = market
            .update_item(stranger.id, item.id, patch.clone())
            .unwrap_err();
        assert!(matches!(err, MarketError::NotAuthorized { .. }));

        let updated = market.update_item(owner.id, item.id, patch).unwrap();
        assert_eq!(updated.price, money(600));
    }

    #[test]
    fn update_cannot_move_ownership() {
        let market = marketplace();
        let owner = market.register_user("owner@example.test").unwrap();
        let item = market
            .create_item(owner.id, ItemDraft::new("orb", money(500)))
            .unwrap();
        let updated = market
            .update_item(
                owner.id,
                item.id,
                ItemPatch {
                    is_listed: Some(false),
                    ..ItemPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.current_owner_id, owner.id);
        assert_eq!(updated.creator_id, owner.id);
    }

    #[test]
    fn delete_unreferenced_item() {
        let market = marketplace();
        let owner = market.register_user("owner@example.test").unwrap();
        let item = market
            .create_item(owner.id, ItemDraft::new("orb", money(500)))
            .unwrap();
        market.delete_item(owner.id, item.id).unwrap();
        assert!(matches!(
            market.get_item(item.id).unwrap_err(),
            MarketError::ItemNotFound(_)
        ));
    }

    #[test]
    fn list_items_filters() {
        let market = marketplace();
        let a = market.register_user("a@example.test").unwrap();
        let b = market.register_user("b@example.test").unwrap();
        market
            .create_item(a.id, ItemDraft::new("one", money(100)))
            .unwrap();
        let mut unlisted = ItemDraft::new("two", money(200));
        unlisted.is_listed = false;
        market.create_item(a.id, unlisted).unwrap();
        market
            .create_item(b.id, ItemDraft::new("three", money(300)))
            .unwrap();

        let listed = market.list_items(ItemFilter {
            is_listed: Some(true),
            ..ItemFilter::default()
        });
        assert_eq!(listed.len(), 2);

        let by_owner = market.list_items(ItemFilter {
            owner_id: Some(a.id),
            ..ItemFilter::default()
        });
        assert_eq!(by_owner.len(), 2);
    }
}
