//! Balance ledger operations.
//!
//! Deposits and withdrawals are single-row mutations, but they still run as
//! full store transactions so concurrent requests against the same balance
//! cannot lose updates. Balances are provisioned at registration and
//! re-provisioned on first access if somehow absent — a balance is never
//! missing during a financial operation.

use openmart_types::{Balance, MarketError, Money, Result, User, UserId};

use crate::Marketplace;

impl Marketplace {
    /// Register a new account and provision its zero balance.
    ///
    /// # Errors
    /// [`MarketError::EmailTaken`] if the (normalized) email is in use.
    pub fn register_user(&self, email: &str) -> Result<User> {
        let user = User::new(email);
        let registered = user.clone();
        self.store().transaction(move |tables| {
            let user_id = user.id;
            tables.insert_user(user)?;
            tables.balance_mut_or_provision(user_id)?;
            Ok(())
        })?;
        tracing::debug!(user = %registered.id, "user registered");
        Ok(registered)
    }

    /// The user's balance, provisioning a zero balance if absent.
    ///
    /// # Errors
    /// [`MarketError::UserNotFound`] if the user is not registered.
    pub fn balance_of(&self, user_id: UserId) -> Result<Balance> {
        self.store()
            .transaction(|tables| Ok(tables.balance_mut_or_provision(user_id)?.clone()))
    }

    /// Credit the user's balance.
    ///
    /// # Errors
    /// [`MarketError::InvalidAmount`] unless the amount is strictly positive.
    pub fn add_funds(&self, user_id: UserId, amount: Money) -> Result<Balance> {
        ensure_positive(amount, "deposit")?;
        self.store().transaction(|tables| {
            let balance = tables.balance_mut_or_provision(user_id)?;
            balance.credit(amount)?;
            Ok(balance.clone())
        })
    }

    /// Debit the user's balance. No partial debit: the operation fails
    /// without any change if the balance cannot cover the amount.
    ///
    /// # Errors
    /// [`MarketError::InvalidAmount`] unless the amount is strictly
    /// positive; [`MarketError::InsufficientBalance`] if it exceeds the
    /// current balance.
    pub fn withdraw_funds(&self, user_id: UserId, amount: Money) -> Result<Balance> {
        ensure_positive(amount, "withdrawal")?;
        self.store().transaction(|tables| {
            let balance = tables.balance_mut_or_provision(user_id)?;
            balance.debit(amount)?;
            Ok(balance.clone())
        })
    }
}

fn ensure_positive(amount: Money, what: &str) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(MarketError::InvalidAmount {
            reason: format!("{what} amount must be positive"),
        })
    }
}
