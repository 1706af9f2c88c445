//! Pluggable storage backends for persisting ledger records.
//!
//! The whole record collection lives under a single key and is replaced
//! wholesale on every write, so a backend only has to read and overwrite
//! one value.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

use crate::error::Result;
use crate::models::Record;

/// Storage backend holding the persisted record collection.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for thread-safe mutation.
pub trait RecordStorage: core::fmt::Debug + Send + Sync {
    /// Returns the stored records in their stored order (newest first).
    ///
    /// Returns an empty `Vec` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored data
    /// is malformed.
    fn load(&self) -> Result<Vec<Record>>;

    /// Replaces the stored collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    fn save(&self, records: &[Record]) -> Result<()>;
}

impl<S: RecordStorage + ?Sized> RecordStorage for &S {
    #[inline]
    fn load(&self) -> Result<Vec<Record>> {
        (**self).load()
    }

    #[inline]
    fn save(&self, records: &[Record]) -> Result<()> {
        (**self).save(records)
    }
}
