//! The atomicity and isolation envelope around [`Tables`].
//!
//! Every mutating marketplace operation runs as one [`Store::transaction`]
//! call: the write lock serializes it against all other operations on the
//! same store, and the snapshot taken before the closure runs is restored
//! if the closure returns an error. Either every mutation in the unit
//! commits or none does — no intermediate state is observable.

use std::sync::{PoisonError, RwLock};

use openmart_types::Result;

use crate::tables::Tables;

/// Shared, transactional entity store.
///
/// `Store` is `Send + Sync`; request handlers share it behind an `Arc` and
/// call operations concurrently. Isolation is serializable-or-better for
/// mutations: one writer at a time, readers see only committed state.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    /// Run a read-only query against committed state.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let guard = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` as a single atomic unit.
    ///
    /// On `Ok` the mutations commit; on `Err` the pre-transaction snapshot
    /// is restored and the error propagates unchanged, so the caller can
    /// rely on zero persisted side effects from a failed unit.
    ///
    /// # Errors
    /// Whatever `f` returns.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut Tables) -> Result<R>) -> Result<R> {
        let mut guard = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let snapshot = guard.clone();
        match f(&mut guard) {
            Ok(value) => Ok(value),
            Err(err) => {
                *guard = snapshot;
                Err(err)
            }
        }
    }
}
