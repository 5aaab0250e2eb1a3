//! Error types for the OpenMart marketplace core.
//!
//! All errors use the `MKT_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Entity lookup errors
//! - 2xx: Money / balance errors
//! - 3xx: Offer creation errors
//! - 4xx: Offer state-machine errors
//! - 5xx: Authorization errors
//! - 6xx: Referential-integrity errors
//! - 9xx: General / internal errors
//!
//! Every domain-rule violation aborts the whole atomic unit it occurred in;
//! no error leaves the store partially mutated.

use thiserror::Error;

use crate::{ItemId, Money, OfferId, OfferStatus, TransactionId, UserId};

/// Central error enum for all OpenMart operations.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Entity lookup errors (1xx)
    // =================================================================
    /// No user with the given ID is registered.
    #[error("MKT_ERR_100: user not found: {0}")]
    UserNotFound(UserId),

    /// The requested item does not exist.
    #[error("MKT_ERR_101: item not found: {0}")]
    ItemNotFound(ItemId),

    /// The requested offer does not exist (or was cancelled).
    #[error("MKT_ERR_102: offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The requested settlement record does not exist.
    #[error("MKT_ERR_103: transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    // =================================================================
    // Money / balance errors (2xx)
    // =================================================================
    /// Malformed or out-of-bounds money input.
    #[error("MKT_ERR_200: invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Not enough balance to cover the operation.
    #[error("MKT_ERR_201: insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Money, available: Money },

    // =================================================================
    // Offer creation errors (3xx)
    // =================================================================
    /// The item is not currently listed for sale.
    #[error("MKT_ERR_300: item {0} is not listed for sale")]
    ItemNotListed(ItemId),

    /// A buyer may not make an offer on an item they currently own.
    #[error("MKT_ERR_301: cannot make an offer for your own item")]
    SelfTradeForbidden,

    /// The buyer already holds a pending offer on this item.
    #[error("MKT_ERR_302: a pending offer for item {item_id} already exists: {offer_id}")]
    DuplicatePendingOffer { item_id: ItemId, offer_id: OfferId },

    // =================================================================
    // Offer state-machine errors (4xx)
    // =================================================================
    /// The offer is not in a state that permits the attempted transition.
    /// The message embeds the current status for diagnosis.
    #[error("MKT_ERR_400: cannot {action} an offer that is {current}")]
    InvalidTransition {
        action: &'static str,
        current: OfferStatus,
    },

    // =================================================================
    // Authorization errors (5xx)
    // =================================================================
    /// The acting user is not the buyer/seller of record for this entity.
    #[error("MKT_ERR_500: not authorized: {reason}")]
    NotAuthorized { reason: &'static str },

    // =================================================================
    // Referential-integrity errors (6xx)
    // =================================================================
    /// The item is referenced by offers or transactions and cannot be deleted.
    #[error("MKT_ERR_600: item {0} is referenced by offers or transactions")]
    ItemInUse(ItemId),

    /// A user with this email address is already registered.
    #[error("MKT_ERR_601: email already registered: {0}")]
    EmailTaken(String),

    // =================================================================
    // General / internal (9xx)
    // =================================================================
    /// Unrecoverable internal error (broken store invariant, etc.).
    #[error("MKT_ERR_900: internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;
