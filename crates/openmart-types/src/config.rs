//! Configuration for the OpenMart marketplace core.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::Money;

/// Validation limits applied by the engine.
///
/// The defaults mirror the marketplace's public rules: offers start at
/// $1.00, prices cap at $100M, titles and image URLs at 255 characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketConfig {
    /// Minimum price a buyer may offer.
    pub min_offer_price: Money,
    /// Maximum price for any item or offer.
    pub max_price: Money,
    /// Maximum item title length in characters.
    pub max_title_len: usize,
    /// Maximum item image URL length in characters.
    pub max_image_url_len: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            min_offer_price: Money::from_minor_unchecked(constants::MIN_OFFER_PRICE_MINOR),
            max_price: Money::from_minor_unchecked(constants::MAX_PRICE_MINOR),
            max_title_len: constants::MAX_TITLE_LEN,
            max_image_url_len: constants::MAX_IMAGE_URL_LEN,
        }
    }
}
