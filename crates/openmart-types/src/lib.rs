//! # openmart-types
//!
//! Shared types, errors, and configuration for the **OpenMart** marketplace core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`ItemId`], [`OfferId`], [`TransactionId`]
//! - **Money**: [`Money`], exact integer-cents arithmetic
//! - **Entity models**: [`User`], [`Balance`], [`Item`], [`Offer`], [`Transaction`]
//! - **Offer lifecycle**: [`OfferStatus`] with transition guards on [`Offer`]
//! - **Configuration**: [`MarketConfig`]
//! - **Errors**: [`MarketError`] with `MKT_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod item;
pub mod money;
pub mod offer;
pub mod transaction;
pub mod user;

// Re-export all primary types at crate root for ergonomic imports:
//   use openmart_types::{Money, Offer, OfferStatus, MarketError, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use item::*;
pub use money::*;
pub use offer::*;
pub use transaction::*;
pub use user::*;

// Constants are accessed via `openmart_types::constants::FOO`
// (not re-exported to avoid name collisions).
