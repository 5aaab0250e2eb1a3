//! The settlement engine: offer acceptance as one atomic unit.
//!
//! Accepting an offer spans four entities — the offer itself, its sibling
//! offers, both parties' balances, and the item. The whole sequence runs
//! inside a single store transaction:
//!
//! 1. Authorize the actor against the offer's seller of record
//! 2. Guard: the offer must still be pending
//! 3. Guard: the buyer's balance must cover the price *now* (the
//!    creation-time check is stale by definition)
//! 4. Offer -> Accepted
//! 5. Every other pending offer on the item -> Declined
//! 6. Record the transaction (agreed price + item's listed price right now)
//! 7. Debit the buyer — checked again at the write, so a racing balance
//!    change still cannot drive the ledger negative
//! 8. Credit the seller
//! 9. Move item ownership to the buyer and delist it
//!
//! Any error at any step rolls the whole unit back. Concurrent acceptances
//! on the same item serialize on the store's writer lock; the loser finds
//! the offer no longer pending and fails the transition guard.

use openmart_store::Tables;
use openmart_types::{
    MarketError, Offer, OfferId, Result, Transaction, TransactionId, UserId,
};

use crate::{Marketplace, ParticipantRole};

/// Outcome of a successful settlement.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// The accepted offer.
    pub offer: Offer,
    /// The immutable settlement record.
    pub transaction: Transaction,
}

impl Marketplace {
    /// Accept a pending offer and execute the trade. Seller of record only.
    ///
    /// This is the single settlement entry point: every ownership transfer
    /// and every settlement-driven balance movement goes through here.
    ///
    /// # Errors
    /// [`MarketError::OfferNotFound`], [`MarketError::NotAuthorized`],
    /// [`MarketError::InvalidTransition`],
    /// [`MarketError::InsufficientBalance`] — in all cases with zero
    /// persisted side effects.
    pub fn accept_offer(&self, seller: UserId, offer_id: OfferId) -> Result<Settlement> {
        let settlement = self
            .store()
            .transaction(|tables| execute_settlement(tables, seller, offer_id))?;
        tracing::info!(
            offer = %settlement.offer.id,
            item = %settlement.transaction.item_id,
            buyer = %settlement.transaction.buyer_id,
            seller = %settlement.transaction.seller_id,
            amount = %settlement.transaction.amount,
            "offer settled"
        );
        Ok(settlement)
    }

    /// Fetch a settlement record. Participants only.
    ///
    /// # Errors
    /// [`MarketError::TransactionNotFound`], [`MarketError::NotAuthorized`].
    pub fn get_transaction(
        &self,
        actor: UserId,
        transaction_id: TransactionId,
    ) -> Result<Transaction> {
        self.store().read(|tables| {
            let transaction = tables.transaction(transaction_id)?;
            if transaction.buyer_id != actor && transaction.seller_id != actor {
                return Err(MarketError::NotAuthorized {
                    reason: "only the buyer or seller of record can view a transaction",
                });
            }
            Ok(transaction.clone())
        })
    }

    /// Settlement records the user participates in, newest first.
    #[must_use]
    pub fn transactions_for(&self, user_id: UserId, role: ParticipantRole) -> Vec<Transaction> {
        self.store()
            .read(|tables| tables.transactions_for_user(user_id, role))
    }
}

/// The settlement sequence, run inside an open transaction. Kept separate
/// from the [`Store`](openmart_store::Store) envelope so tests can compose
/// it with a forced failure and observe the rollback.
fn execute_settlement(tables: &mut Tables, seller: UserId, offer_id: OfferId) -> Result<Settlement> {
    let offer = tables.offer(offer_id)?;
    if offer.seller_id != seller {
        return Err(MarketError::NotAuthorized {
            reason: "only the seller of record can accept an offer",
        });
    }
    offer.ensure_pending("accept")?;
    let (item_id, buyer_id, price) = (offer.item_id, offer.buyer_id, offer.price);

    // Solvency is re-checked against the balance of this moment.
    let buyer_balance = tables.balance_mut_or_provision(buyer_id)?;
    if !buyer_balance.can_cover(price) {
        return Err(MarketError::InsufficientBalance {
            needed: price,
            available: buyer_balance.amount,
        });
    }

    let accepted = {
        let offer = tables.offer_mut(offer_id)?;
        offer.accept()?;
        offer.clone()
    };

    let declined = tables.decline_other_pending(item_id, offer_id);
    if declined > 0 {
        tracing::debug!(item = %item_id, count = declined, "competing offers declined");
    }

    let listed_price = tables.item(item_id)?.price;
    let transaction = Transaction::new(
        item_id,
        buyer_id,
        accepted.seller_id,
        offer_id,
        price,
        listed_price,
    );
    tables.insert_transaction(transaction.clone())?;

    tables.balance_mut_or_provision(buyer_id)?.debit(price)?;
    tables
        .balance_mut_or_provision(accepted.seller_id)?
        .credit(price)?;

    let item = tables.item_mut(item_id)?;
    item.current_owner_id = buyer_id;
    item.is_listed = false;
    item.touch();

    Ok(Settlement {
        offer: accepted,
        transaction,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use openmart_store::Store;
    use openmart_types::{ItemId, Money, OfferStatus};

    use super::*;
    use crate::ItemDraft;

    fn money(minor: i64) -> Money {
        Money::from_minor_units(minor).unwrap()
    }

    struct Fixture {
        market: Marketplace,
        seller: UserId,
        buyer1: UserId,
        buyer2: UserId,
        item: ItemId,
    }

    /// Seller with an empty balance lists a $100.00 item; two funded buyers
    /// hold pending offers of $100.00 and $120.00.
    fn two_buyer_fixture() -> (Fixture, OfferId, OfferId) {
        let market = Marketplace::new(Arc::new(Store::new()));
        let seller = market.register_user("seller@example.test").unwrap().id;
        let buyer1 = market.register_user("buyer1@example.test").unwrap().id;
        let buyer2 = market.register_user("buyer2@example.test").unwrap().id;
        market.add_funds(buyer1, money(15_000)).unwrap();
        market.add_funds(buyer2, money(15_000)).unwrap();
        let item = market
            .create_item(seller, ItemDraft::new("pixel dragon", money(10_000)))
            .unwrap()
            .id;
        let offer1 = market.create_offer(buyer1, item, money(10_000)).unwrap().id;
        let offer2 = market.create_offer(buyer2, item, money(12_000)).unwrap().id;
        (
            Fixture {
                market,
                seller,
                buyer1,
                buyer2,
                item,
            },
            offer1,
            offer2,
        )
    }

    #[test]
    fn settlement_moves_funds_ownership_and_declines_siblings() {
        let (f, offer1, offer2) = two_buyer_fixture();

        let settlement = f.market.accept_offer(f.seller, offer1).unwrap();
        assert_eq!(settlement.offer.status, OfferStatus::Accepted);
        assert_eq!(settlement.transaction.amount, money(10_000));
        assert_eq!(settlement.transaction.original_price, money(10_000));

        assert_eq!(f.market.balance_of(f.buyer1).unwrap().amount, money(5_000));
        assert_eq!(f.market.balance_of(f.seller).unwrap().amount, money(10_000));
        assert_eq!(f.market.balance_of(f.buyer2).unwrap().amount, money(15_000));

        let sibling = f.market.get_offer(f.buyer2, offer2).unwrap();
        assert_eq!(sibling.status, OfferStatus::Declined);

        let item = f.market.get_item(f.item).unwrap();
        assert_eq!(item.current_owner_id, f.buyer1);
        assert!(!item.is_listed);
    }

    #[test]
    fn original_price_snapshots_the_listed_price_at_settlement() {
        let (f, offer1, _) = two_buyer_fixture();
        // seller re-prices the item after the offers exist
        f.market
            .update_item(
                f.seller,
                f.item,
                crate::ItemPatch {
                    price: Some(money(11_000)),
                    ..crate::ItemPatch::default()
                },
            )
            .unwrap();

        let settlement = f.market.accept_offer(f.seller, offer1).unwrap();
        assert_eq!(settlement.transaction.amount, money(10_000));
        assert_eq!(settlement.transaction.original_price, money(11_000));
    }

    #[test]
    fn acceptance_rechecks_solvency_and_stays_pending_on_failure() {
        let (f, offer1, _) = two_buyer_fixture();
        // buyer1 drains funds after making the offer
        f.market.withdraw_funds(f.buyer1, money(10_000)).unwrap();

        let err = f.market.accept_offer(f.seller, offer1).unwrap_err();
        assert!(matches!(err, MarketError::InsufficientBalance { .. }));

        let offer = f.market.get_offer(f.seller, offer1).unwrap();
        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(f.market.balance_of(f.buyer1).unwrap().amount, money(5_000));
        assert_eq!(f.market.balance_of(f.seller).unwrap().amount, Money::ZERO);
        assert!(f.market.get_item(f.item).unwrap().is_listed);
        assert!(
            f.market
                .transactions_for(f.buyer1, ParticipantRole::Either)
                .is_empty()
        );
    }

    #[test]
    fn second_accept_fails_with_invalid_transition_and_changes_nothing() {
        let (f, offer1, _) = two_buyer_fixture();
        f.market.accept_offer(f.seller, offer1).unwrap();

        let err = f.market.accept_offer(f.seller, offer1).unwrap_err();
        let msg = format!("{err}");
        assert!(
            matches!(err, MarketError::InvalidTransition { .. }),
            "Got: {msg}"
        );
        assert!(msg.contains("accepted"), "Got: {msg}");

        // balances unchanged by the rejected second call
        assert_eq!(f.market.balance_of(f.buyer1).unwrap().amount, money(5_000));
        assert_eq!(f.market.balance_of(f.seller).unwrap().amount, money(10_000));
        assert_eq!(
            f.market
                .transactions_for(f.seller, ParticipantRole::Seller)
                .len(),
            1
        );
    }

    #[test]
    fn accepting_a_declined_offer_names_the_status() {
        let (f, offer1, _) = two_buyer_fixture();
        f.market.decline_offer(f.seller, offer1).unwrap();

        let err = f.market.accept_offer(f.seller, offer1).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("declined"), "Got: {msg}");
    }

    #[test]
    fn only_the_seller_of_record_can_accept() {
        let (f, offer1, _) = two_buyer_fixture();
        let err = f.market.accept_offer(f.buyer2, offer1).unwrap_err();
        assert!(matches!(err, MarketError::NotAuthorized { .. }));
        assert!(f.market.get_offer(f.seller, offer1).unwrap().is_pending());
    }

    #[test]
    fn forced_failure_after_full_mutation_rolls_back_all_five_entities() {
        let (f, offer1, offer2) = two_buyer_fixture();

        // Run the entire settlement sequence, then fail the same unit.
        let err = f
            .market
            .store()
            .transaction(|tables| {
                execute_settlement(tables, f.seller, offer1)?;
                Err::<(), _>(MarketError::Internal("forced failure".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, MarketError::Internal(_)));

        // offer status
        assert!(f.market.get_offer(f.seller, offer1).unwrap().is_pending());
        // sibling offers
        assert!(f.market.get_offer(f.buyer2, offer2).unwrap().is_pending());
        // transaction existence
        assert!(
            f.market
                .transactions_for(f.seller, ParticipantRole::Seller)
                .is_empty()
        );
        // balances
        assert_eq!(f.market.balance_of(f.buyer1).unwrap().amount, money(15_000));
        assert_eq!(f.market.balance_of(f.seller).unwrap().amount, Money::ZERO);
        // item ownership and listing
        let item = f.market.get_item(f.item).unwrap();
        assert_eq!(item.current_owner_id, f.seller);
        assert!(item.is_listed);
    }

    #[test]
    fn transaction_view_restricted_to_participants() {
        let (f, offer1, _) = two_buyer_fixture();
        let settlement = f.market.accept_offer(f.seller, offer1).unwrap();

        let fetched = f
            .market
            .get_transaction(f.buyer1, settlement.transaction.id)
            .unwrap();
        assert_eq!(fetched.digest(), settlement.transaction.digest());

        let err = f
            .market
            .get_transaction(f.buyer2, settlement.transaction.id)
            .unwrap_err();
        assert!(matches!(err, MarketError::NotAuthorized { .. }));
    }
}
