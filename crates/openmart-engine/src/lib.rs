//! # openmart-engine
//!
//! The operation surface of the OpenMart marketplace core. An external
//! request layer (out of scope here) resolves the acting user from its
//! session machinery and calls these operations synchronously; actor
//! identity is always an explicit parameter, never ambient state.
//!
//! Every mutating operation executes as exactly one store transaction:
//! all-or-nothing, serialized against concurrent operations on the same
//! entities. See the module docs for the operation groups:
//!
//! - [`ledger`] — user registration, balance queries, add/withdraw funds
//! - [`listings`] — item CRUD and item queries
//! - [`offers`] — offer creation, decline, cancellation, offer queries
//! - [`settlement`] — offer acceptance (the atomic trade) and
//!   transaction-record queries

pub mod ledger;
pub mod listings;
pub mod offers;
pub mod settlement;

use std::sync::Arc;

use openmart_store::Store;
use openmart_types::MarketConfig;

pub use listings::{ItemDraft, ItemPatch};
pub use settlement::Settlement;

// Re-exported so callers need only this crate for the common path.
pub use openmart_store::{ItemFilter, ParticipantRole};

/// The marketplace service. Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct Marketplace {
    store: Arc<Store>,
    config: MarketConfig,
}

impl Marketplace {
    /// Create a marketplace over the given store with default limits.
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_config(store, MarketConfig::default())
    }

    /// Create a marketplace with explicit limits.
    #[must_use]
    pub fn with_config(store: Arc<Store>, config: MarketConfig) -> Self {
        Self { store, config }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The active limits.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }
}
