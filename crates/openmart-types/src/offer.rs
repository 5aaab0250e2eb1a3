//! Offer model and lifecycle state machine.
//!
//! An offer is created `Pending` and transitions exactly once to `Accepted`
//! or `Declined`. A pending offer may instead be deleted outright (buyer
//! cancellation) — a terminal outcome distinct from `Declined`. Non-pending
//! offers are immutable.
//!
//! `seller_id` is the item's current owner captured at creation time and is
//! never re-derived, even if the item changes hands before acceptance.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, MarketError, Money, OfferId, Result, UserId};

/// Lifecycle status of an offer. Closed enumeration, persisted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Declined => write!(f, "declined"),
        }
    }
}

/// A buyer's offer on a listed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: OfferId,
    pub item_id: ItemId,
    pub buyer_id: UserId,
    /// The seller of record: the item's owner when the offer was created.
    pub seller_id: UserId,
    pub price: Money,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// Create a new pending offer.
    #[must_use]
    pub fn new(item_id: ItemId, buyer_id: UserId, seller_id: UserId, price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: OfferId::new(),
            item_id,
            buyer_id,
            seller_id,
            price,
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OfferStatus::Pending
    }

    /// Guard: the offer must still be pending for `action` to proceed.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidTransition`] embedding the current
    /// status (e.g. "cannot cancel an offer that is accepted").
    pub fn ensure_pending(&self, action: &'static str) -> Result<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(MarketError::InvalidTransition {
                action,
                current: self.status,
            })
        }
    }

    /// Transition `Pending → Accepted`.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidTransition`] if not pending.
    pub fn accept(&mut self) -> Result<()> {
        self.ensure_pending("accept")?;
        self.status = OfferStatus::Accepted;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition `Pending → Declined`.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidTransition`] if not pending.
    pub fn decline(&mut self) -> Result<()> {
        self.ensure_pending("decline")?;
        self.status = OfferStatus::Declined;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Offer {
    #[must_use]
    pub fn dummy(item_id: ItemId, buyer_id: UserId, seller_id: UserId, price: Money) -> Self {
        Self::new(item_id, buyer_id, seller_id, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_offer() -> Offer {
        Offer::new(
            ItemId::new(),
            UserId::new(),
            UserId::new(),
            Money::from_minor_units(10_000).unwrap(),
        )
    }

    #[test]
    fn new_offer_is_pending() {
        assert!(pending_offer().is_pending());
    }

    #[test]
    fn accept_transitions_once() {
        let mut offer = pending_offer();
        offer.accept().unwrap();
        assert_eq!(offer.status, OfferStatus::Accepted);

        let err = offer.accept().unwrap_err();
        assert!(matches!(
            err,
            MarketError::InvalidTransition {
                current: OfferStatus::Accepted,
                ..
            }
        ));
    }

    #[test]
    fn decline_is_terminal() {
        let mut offer = pending_offer();
        offer.decline().unwrap();
        let err = offer.accept().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("declined"), "Got: {msg}");
    }

    #[test]
    fn ensure_pending_message_embeds_status() {
        let mut offer = pending_offer();
        offer.accept().unwrap();
        let err = offer.ensure_pending("cancel").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("cancel"));
        assert!(msg.contains("accepted"));
    }

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(format!("{}", OfferStatus::Pending), "pending");
        assert_eq!(format!("{}", OfferStatus::Accepted), "accepted");
        assert_eq!(format!("{}", OfferStatus::Declined), "declined");
    }

    #[test]
    fn status_serde_roundtrip() {
        let json = serde_json::to_string(&OfferStatus::Declined).unwrap();
        assert_eq!(json, "\"declined\"");
        let back: OfferStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OfferStatus::Declined);
    }
}
