//! Offer creation, decline, cancellation, and queries.
//!
//! Creation runs the full validation chain in one transaction so the checks
//! and the insert see the same state. The creation-time solvency check is
//! advisory only — acceptance re-validates against the balance of the
//! moment (see [`crate::settlement`]).

use openmart_types::{
    ItemId, MarketError, Money, Offer, OfferId, OfferStatus, Result, UserId,
};

use crate::{Marketplace, ParticipantRole};

impl Marketplace {
    /// Create a pending offer on a listed item.
    ///
    /// The item's current owner is captured as the offer's seller of record
    /// and is never re-derived afterwards.
    ///
    /// # Errors
    /// In check order: [`MarketError::ItemNotFound`],
    /// [`MarketError::ItemNotListed`], [`MarketError::SelfTradeForbidden`],
    /// [`MarketError::DuplicatePendingOffer`],
    /// [`MarketError::InvalidAmount`] (price bounds),
    /// [`MarketError::InsufficientBalance`].
    pub fn create_offer(&self, buyer: UserId, item_id: ItemId, price: Money) -> Result<Offer> {
        let offer = self.store().transaction(|tables| {
            tables.user(buyer)?;
            let item = tables.item(item_id)?;
            if !item.is_listed {
                return Err(MarketError::ItemNotListed(item_id));
            }
            if item.is_owned_by(buyer) {
                return Err(MarketError::SelfTradeForbidden);
            }
            let seller = item.current_owner_id;
            if let Some(existing) = tables.pending_offer_by_buyer(item_id, buyer) {
                return Err(MarketError::DuplicatePendingOffer {
                    item_id,
                    offer_id: existing.id,
                });
            }
            if price < self.config().min_offer_price {
                return Err(MarketError::InvalidAmount {
                    reason: format!(
                        "offer price {price} is below the minimum {}",
                        self.config().min_offer_price
                    ),
                });
            }
            self.check_price(price)?;
            let balance = tables.balance_mut_or_provision(buyer)?;
            if !balance.can_cover(price) {
                return Err(MarketError::InsufficientBalance {
                    needed: price,
                    available: balance.amount,
                });
            }
            let offer = Offer::new(item_id, buyer, seller, price);
            tables.insert_offer(offer.clone())?;
            Ok(offer)
        })?;
        tracing::debug!(offer = %offer.id, item = %item_id, price = %price, "offer created");
        Ok(offer)
    }

    /// Decline a pending offer. Seller of record only.
    ///
    /// # Errors
    /// [`MarketError::OfferNotFound`], [`MarketError::NotAuthorized`],
    /// [`MarketError::InvalidTransition`].
    pub fn decline_offer(&self, seller: UserId, offer_id: OfferId) -> Result<Offer> {
        self.store().transaction(|tables| {
            let offer = tables.offer_mut(offer_id)?;
            if offer.seller_id != seller {
                return Err(MarketError::NotAuthorized {
                    reason: "only the seller of record can decline an offer",
                });
            }
            offer.decline()?;
            Ok(offer.clone())
        })
    }

    /// Cancel (delete) a pending offer. Buyer of record only; non-pending
    /// offers are immutable and cannot be cancelled.
    ///
    /// # Errors
    /// [`MarketError::OfferNotFound`], [`MarketError::NotAuthorized`],
    /// [`MarketError::InvalidTransition`] embedding the current status.
    pub fn cancel_offer(&self, buyer: UserId, offer_id: OfferId) -> Result<()> {
        self.store().transaction(|tables| {
            let offer = tables.offer(offer_id)?;
            if offer.buyer_id != buyer {
                return Err(MarketError::NotAuthorized {
                    reason: "only the buyer of record can cancel an offer",
                });
            }
            offer.ensure_pending("cancel")?;
            tables.remove_offer(offer_id)?;
            Ok(())
        })
    }

    /// Fetch an offer. Participants only.
    ///
    /// # Errors
    /// [`MarketError::OfferNotFound`], [`MarketError::NotAuthorized`].
    pub fn get_offer(&self, actor: UserId, offer_id: OfferId) -> Result<Offer> {
        self.store().read(|tables| {
            let offer = tables.offer(offer_id)?;
            if offer.buyer_id != actor && offer.seller_id != actor {
                return Err(MarketError::NotAuthorized {
                    reason: "only the buyer or seller of record can view an offer",
                });
            }
            Ok(offer.clone())
        })
    }

    /// Offers the user participates in, optionally filtered, newest first.
    #[must_use]
    pub fn offers_for(
        &self,
        user_id: UserId,
        role: ParticipantRole,
        status: Option<OfferStatus>,
    ) -> Vec<Offer> {
        self.store()
            .read(|tables| tables.offers_for_user(user_id, role, status))
    }
}
