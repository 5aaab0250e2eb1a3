//! Balance tracking for the OpenMart cash ledger.
//!
//! Every user holds exactly one balance. All mutations go through
//! [`Balance::credit`] and [`Balance::debit`]: either the full operation
//! succeeds or the balance is unchanged, and `amount >= 0` always holds
//! because [`crate::Money`] cannot encode a negative value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MarketError, Money, Result, UserId};

/// A single user's cash balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub user_id: UserId,
    pub amount: Money,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// A fresh zero balance for the given user.
    #[must_use]
    pub fn zero(user_id: UserId) -> Self {
        Self {
            user_id,
            amount: Money::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Whether the balance can cover `amount`.
    #[must_use]
    pub fn can_cover(&self, amount: Money) -> bool {
        self.amount >= amount
    }

    /// Add funds.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidAmount`] on overflow.
    pub fn credit(&mut self, amount: Money) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or_else(|| MarketError::InvalidAmount {
                reason: format!("balance overflow crediting {amount}"),
            })?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove funds. Fails without touching the balance if it would go
    /// negative.
    ///
    /// # Errors
    /// Returns [`MarketError::InsufficientBalance`] if `amount > self.amount`.
    pub fn debit(&mut self, amount: Money) -> Result<()> {
        self.amount =
            self.amount
                .checked_sub(amount)
                .ok_or(MarketError::InsufficientBalance {
                    needed: amount,
                    available: self.amount,
                })?;
        self.updated_at = Utc::now();
        Ok(())
    }
}
