//! Typed entity tables with foreign-key integrity.
//!
//! `Tables` is the source of truth for all persisted state. Every mutator
//! validates referential integrity before writing: inserts require the rows
//! they reference to exist, and removals refuse while references remain.
//! Callers get atomicity and isolation from [`crate::Store`]; the methods
//! here assume they already run inside that envelope.

use std::collections::HashMap;

use chrono::Utc;
use openmart_types::{
    Balance, Item, ItemId, MarketError, Offer, OfferId, OfferStatus, Result, Transaction,
    TransactionId, User, UserId,
};

/// Which side of a trade a user is queried as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Buyer,
    Seller,
    Either,
}

/// Filter for item listings. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFilter {
    pub is_listed: Option<bool>,
    pub owner_id: Option<UserId>,
    pub creator_id: Option<UserId>,
}

/// All entity tables. Cloning snapshots the full state, which is what
/// [`crate::Store::transaction`] relies on for rollback.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    users: HashMap<UserId, User>,
    balances: HashMap<UserId, Balance>,
    items: HashMap<ItemId, Item>,
    offers: HashMap<OfferId, Offer>,
    transactions: HashMap<TransactionId, Transaction>,
}

impl Tables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------

    /// Insert a new user. Emails are unique.
    ///
    /// # Errors
    /// `EmailTaken` if another user holds the same (normalized) email.
    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.users.values().any(|u| u.email == user.email) {
            return Err(MarketError::EmailTaken(user.email));
        }
        if self.users.insert(user.id, user).is_some() {
            return Err(MarketError::Internal("duplicate user id".to_string()));
        }
        Ok(())
    }

    pub fn user(&self, user_id: UserId) -> Result<&User> {
        self.users
            .get(&user_id)
            .ok_or(MarketError::UserNotFound(user_id))
    }

    // -----------------------------------------------------------------
    // Balances
    // -----------------------------------------------------------------

    #[must_use]
    pub fn balance(&self, user_id: UserId) -> Option<&Balance> {
        self.balances.get(&user_id)
    }

    /// Fetch the user's balance, provisioning a zero balance if absent.
    /// A balance is never missing during a financial operation.
    ///
    /// # Errors
    /// `UserNotFound` if the user itself is not registered.
    pub fn balance_mut_or_provision(&mut self, user_id: UserId) -> Result<&mut Balance> {
        self.user(user_id)?;
        Ok(self
            .balances
            .entry(user_id)
            .or_insert_with(|| Balance::zero(user_id)))
    }

    // -----------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------

    /// Insert a new item.
    ///
    /// # Errors
    /// `UserNotFound` if the creator or owner is not registered.
    pub fn insert_item(&mut self, item: Item) -> Result<()> {
        self.user(item.creator_id)?;
        self.user(item.current_owner_id)?;
        if self.items.insert(item.id, item).is_some() {
            return Err(MarketError::Internal("duplicate item id".to_string()));
        }
        Ok(())
    }

    pub fn item(&self, item_id: ItemId) -> Result<&Item> {
        self.items
            .get(&item_id)
            .ok_or(MarketError::ItemNotFound(item_id))
    }

    pub fn item_mut(&mut self, item_id: ItemId) -> Result<&mut Item> {
        self.items
            .get_mut(&item_id)
            .ok_or(MarketError::ItemNotFound(item_id))
    }

    /// Whether any offer or transaction references the item.
    #[must_use]
    pub fn item_is_referenced(&self, item_id: ItemId) -> bool {
        self.offers.values().any(|o| o.item_id == item_id)
            || self.transactions.values().any(|t| t.item_id == item_id)
    }

    /// Remove an item.
    ///
    /// # Errors
    /// `ItemInUse` while offers or transactions reference it.
    pub fn remove_item(&mut self, item_id: ItemId) -> Result<Item> {
        self.item(item_id)?;
        if self.item_is_referenced(item_id) {
            return Err(MarketError::ItemInUse(item_id));
        }
        self.items
            .remove(&item_id)
            .ok_or(MarketError::ItemNotFound(item_id))
    }

    /// Items matching the filter, newest first.
    #[must_use]
    pub fn items_matching(&self, filter: ItemFilter) -> Vec<Item> {
        let mut found: Vec<Item> = self
            .items
            .values()
            .filter(|item| {
                filter.is_listed.is_none_or(|v| item.is_listed == v)
                    && filter.owner_id.is_none_or(|v| item.current_owner_id == v)
                    && filter.creator_id.is_none_or(|v| item.creator_id == v)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        found
    }

    // -----------------------------------------------------------------
    // Offers
    // -----------------------------------------------------------------

    /// Insert a new offer.
    ///
    /// # Errors
    /// `ItemNotFound` / `UserNotFound` if a referenced row is missing.
    pub fn insert_offer(&mut self, offer: Offer) -> Result<()> {
        self.item(offer.item_id)?;
        self.user(offer.buyer_id)?;
        self.user(offer.seller_id)?;
        if self.offers.insert(offer.id, offer).is_some() {
            return Err(MarketError::Internal("duplicate offer id".to_string()));
        }
        Ok(())
    }

    pub fn offer(&self, offer_id: OfferId) -> Result<&Offer> {
        self.offers
            .get(&offer_id)
            .ok_or(MarketError::OfferNotFound(offer_id))
    }

    pub fn offer_mut(&mut self, offer_id: OfferId) -> Result<&mut Offer> {
        self.offers
            .get_mut(&offer_id)
            .ok_or(MarketError::OfferNotFound(offer_id))
    }

    /// Remove an offer (buyer cancellation).
    ///
    /// # Errors
    /// `Internal` if a transaction references the offer — settled offers
    /// are guarded out before this point, so that would be a broken
    /// invariant, not a user error.
    pub fn remove_offer(&mut self, offer_id: OfferId) -> Result<Offer> {
        self.offer(offer_id)?;
        if self.transactions.values().any(|t| t.offer_id == offer_id) {
            return Err(MarketError::Internal(format!(
                "offer {offer_id} is referenced by a transaction"
            )));
        }
        self.offers
            .remove(&offer_id)
            .ok_or(MarketError::OfferNotFound(offer_id))
    }

    /// The buyer's pending offer on an item, if one exists.
    #[must_use]
    pub fn pending_offer_by_buyer(&self, item_id: ItemId, buyer_id: UserId) -> Option<&Offer> {
        self.offers
            .values()
            .find(|o| o.item_id == item_id && o.buyer_id == buyer_id && o.is_pending())
    }

    /// Bulk-decline every other pending offer on the item. Returns how many
    /// offers were declined.
    pub fn decline_other_pending(&mut self, item_id: ItemId, except: OfferId) -> usize {
        let now = Utc::now();
        let mut declined = 0;
        for offer in self.offers.values_mut() {
            if offer.item_id == item_id && offer.id != except && offer.is_pending() {
                offer.status = OfferStatus::Declined;
                offer.updated_at = now;
                declined += 1;
            }
        }
        declined
    }

    /// Offers the user participates in, optionally filtered, newest first.
    #[must_use]
    pub fn offers_for_user(
        &self,
        user_id: UserId,
        role: ParticipantRole,
        status: Option<OfferStatus>,
    ) -> Vec<Offer> {
        let mut found: Vec<Offer> = self
            .offers
            .values()
            .filter(|o| {
                let participates = match role {
                    ParticipantRole::Buyer => o.buyer_id == user_id,
                    ParticipantRole::Seller => o.seller_id == user_id,
                    ParticipantRole::Either => o.buyer_id == user_id || o.seller_id == user_id,
                };
                participates && status.is_none_or(|s| o.status == s)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        found
    }

    // -----------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------

    /// Insert a settlement record.
    ///
    /// # Errors
    /// Missing referenced rows surface as their lookup errors; a second
    /// record for the same offer is a broken invariant (`Internal`).
    pub fn insert_transaction(&mut self, transaction: Transaction) -> Result<()> {
        self.item(transaction.item_id)?;
        self.user(transaction.buyer_id)?;
        self.user(transaction.seller_id)?;
        self.offer(transaction.offer_id)?;
        if self.transaction_for_offer(transaction.offer_id).is_some() {
            return Err(MarketError::Internal(format!(
                "offer {} already has a settlement record",
                transaction.offer_id
            )));
        }
        if self
            .transactions
            .insert(transaction.id, transaction)
            .is_some()
        {
            return Err(MarketError::Internal(
                "duplicate transaction id".to_string(),
            ));
        }
        Ok(())
    }

    pub fn transaction(&self, transaction_id: TransactionId) -> Result<&Transaction> {
        self.transactions
            .get(&transaction_id)
            .ok_or(MarketError::TransactionNotFound(transaction_id))
    }

    /// The settlement record for an offer, if it has one.
    #[must_use]
    pub fn transaction_for_offer(&self, offer_id: OfferId) -> Option<&Transaction> {
        self.transactions
            .values()
            .find(|t| t.offer_id == offer_id)
    }

    /// Settlement records the user participates in, newest first.
    #[must_use]
    pub fn transactions_for_user(
        &self,
        user_id: UserId,
        role: ParticipantRole,
    ) -> Vec<Transaction> {
        let mut found: Vec<Transaction> = self
            .transactions
            .values()
            .filter(|t| match role {
                ParticipantRole::Buyer => t.buyer_id == user_id,
                ParticipantRole::Seller => t.seller_id == user_id,
                ParticipantRole::Either => t.buyer_id == user_id || t.seller_id == user_id,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.executed_at
                .cmp(&a.executed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        found
    }
}
