//! Exact money representation for the OpenMart ledger.
//!
//! [`Money`] stores an amount as `i64` minor units (cents) — the integer
//! value is the single authoritative representation everywhere in the core
//! and on the wire. `rust_decimal` is used only at the boundary, to accept
//! and render decimal amounts losslessly. Floating point never appears.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MONEY_SCALE;
use crate::{MarketError, Result};

/// A non-negative amount of currency in integer minor units (cents).
///
/// `Money` cannot encode a negative value: constructors reject negative
/// inputs and [`Money::checked_sub`] returns `None` rather than underflow.
/// That makes the ledger's `amount >= 0` invariant structural.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize, Default,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Construct from integer minor units.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidAmount`] for negative values.
    pub fn from_minor_units(minor: i64) -> Result<Self> {
        if minor < 0 {
            return Err(MarketError::InvalidAmount {
                reason: format!("amount cannot be negative: {minor} minor units"),
            });
        }
        Ok(Self(minor))
    }

    /// Construct from a decimal amount with at most 2 fractional digits.
    ///
    /// The conversion is exact: `from_decimal(d).minor_units() == d * 100`
    /// for every representable 2-decimal `d`.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidAmount`] if the value carries more than
    /// 2 fractional digits, is negative, or overflows the minor-unit range.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| MarketError::InvalidAmount {
                reason: format!("amount out of range: {value}"),
            })?;
        if !scaled.fract().is_zero() {
            return Err(MarketError::InvalidAmount {
                reason: format!("amount {value} has more than {MONEY_SCALE} fractional digits"),
            });
        }
        let minor = scaled
            .trunc()
            .to_i64()
            .ok_or_else(|| MarketError::InvalidAmount {
                reason: format!("amount out of range: {value}"),
            })?;
        Self::from_minor_units(minor)
    }

    /// Construct from a decimal string such as `"19.99"`.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidAmount`] on parse failure or any
    /// condition [`Money::from_decimal`] rejects.
    pub fn from_decimal_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str_exact(s).map_err(|e| MarketError::InvalidAmount {
            reason: format!("unparseable amount {s:?}: {e}"),
        })?;
        Self::from_decimal(value)
    }

    /// The authoritative integer minor-unit value.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Derived decimal view (scale 2). Never stored.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition. `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. `None` if `other > self` (would go negative).
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if other.0 > self.0 {
            None
        } else {
            Some(Self(self.0 - other.0))
        }
    }

    /// Internal constructor for compile-time defaults. Callers must pass a
    /// non-negative value.
    pub(crate) const fn from_minor_unchecked(minor: i64) -> Self {
        Self(minor)
    }
}

impl TryFrom<i64> for Money {
    type Error = MarketError;

    fn try_from(minor: i64) -> Result<Self> {
        Self::from_minor_units(minor)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.minor_units()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
