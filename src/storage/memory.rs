//! In-memory storage backend for testing.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! [`super::RecordStorage`]. Ideal for unit and integration tests where
//! file I/O is undesirable.

use std::sync::Mutex;

use crate::error::{LedgerError, Result};
use crate::models::Record;

/// Thread-safe in-memory storage for testing.
///
/// Besides holding the saved collection, it counts successful saves and
/// can be told to reject writes, so callers can observe when the ledger
/// persists and how it reacts to a failing backend.
///
/// # Example
///
/// ```rust
/// use profitool::ledger::Ledger;
/// use profitool::storage::InMemoryStorage;
///
/// let ledger = Ledger::open(InMemoryStorage::new());
/// assert!(ledger.list().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Last saved collection.
    records: Vec<Record>,
    /// Number of successful saves.
    saves: usize,
    /// When set, every save fails.
    fail_saves: bool,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that already holds `records`.
    #[inline]
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                records,
                ..Inner::default()
            }),
        }
    }

    /// Makes subsequent saves fail (`true`) or succeed (`false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    #[inline]
    pub fn set_fail_saves(&self, fail: bool) -> Result<()> {
        self.with_lock(|inner| inner.fail_saves = fail)
    }

    /// Returns how many saves have succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    #[inline]
    pub fn save_count(&self) -> Result<usize> {
        self.with_lock(|inner| inner.saves)
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R, F: FnOnce(&mut Inner) -> R>(&self, op: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(op(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> LedgerError {
    LedgerError::Storage(err.to_string().into())
}

impl super::RecordStorage for InMemoryStorage {
    #[inline]
    fn load(&self) -> Result<Vec<Record>> {
        self.with_lock(|inner| inner.records.clone())
    }

    #[inline]
    fn save(&self, records: &[Record]) -> Result<()> {
        self.with_lock(|inner| {
            if inner.fail_saves {
                return Err(LedgerError::Storage("in-memory storage rejects writes".into()));
            }
            inner.records = records.to_vec();
            inner.saves += 1;
            Ok(())
        })?
    }
}
