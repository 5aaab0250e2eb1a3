//! User accounts.
//!
//! Credentials and sessions live in the out-of-scope identity layer; the
//! core only knows a user's ID and email. Every user owns exactly one
//! [`crate::Balance`], provisioned at registration and lazily re-created on
//! first access if absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A registered marketplace account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Unique, stored lowercase.
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account. The email is normalized to lowercase;
    /// uniqueness is enforced by the store at insert time.
    #[must_use]
    pub fn new(email: &str) -> Self {
        Self {
            id: UserId::new(),
            email: email.trim().to_ascii_lowercase(),
            created_at: Utc::now(),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl User {
    #[must_use]
    pub fn dummy(email: &str) -> Self {
        Self::new(email)
    }
}
