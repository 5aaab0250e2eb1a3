//! System-wide constants for the OpenMart marketplace core.

/// Decimal scale of the display currency (2 digits — cents).
pub const MONEY_SCALE: u32 = 2;

/// Minor units per display unit (100 cents to the dollar).
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// Minimum offer price in minor units ($1.00).
pub const MIN_OFFER_PRICE_MINOR: i64 = 100;

/// Maximum price for any item or offer in minor units ($100,000,000.00).
pub const MAX_PRICE_MINOR: i64 = 10_000_000_000;

/// Maximum item title length in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum item image URL length in characters.
pub const MAX_IMAGE_URL_LEN: usize = 255;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenMart";
