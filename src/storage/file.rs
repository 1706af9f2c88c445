//! Record collection persisted as one JSON document.
//!
//! [`FileStorage`] keeps every record in `records.json` inside a data
//! directory, which defaults to `$XDG_DATA_HOME/profitool/`.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{LedgerError, Result};
use crate::models::Record;

/// Directory name under the platform data dir.
const APP_NAME: &str = "profitool";

/// Document holding the whole collection, newest record first.
const RECORDS_FILE: &str = "records.json";
/// Empty file whose advisory lock guards `records.json` across processes.
const LOCK_FILE: &str = "storage.lock";

/// How a storage operation locks `storage.lock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockMode {
    /// Readers may share the lock.
    Shared,
    /// A single writer holds the lock.
    Exclusive,
}

/// JSON file backend for the ledger.
///
/// Two ledgers opened on the same directory, in one process or in two,
/// never interleave their writes. Threads are serialized by a [`Mutex`];
/// processes by an advisory lock on `storage.lock`, shared for loads and
/// exclusive for saves.
///
/// A save writes `records.json.tmp` first and renames it into place. A
/// reader sees either the old collection or the new one.
///
/// ```text
/// <dir>/
///   records.json
///   storage.lock
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Data directory.
    dir: PathBuf,
    /// Serializes access from threads of this process.
    guard: Mutex<()>,
    /// Handle on `storage.lock`, kept open for the storage's lifetime.
    lock_file: fs::File,
}

impl FileStorage {
    /// Opens the storage in `dir`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] if the directory or its lock file
    /// cannot be created.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file storage");
        Ok(Self {
            dir,
            guard: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns `<platform data dir>/profitool`, for example
    /// `~/.local/share/profitool` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] when the platform has no data
    /// directory.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        let Some(data_dir) = dirs::data_dir() else {
            return Err(LedgerError::Storage(
                "could not determine platform data directory".into(),
            ));
        };
        Ok(data_dir.join(APP_NAME))
    }

    /// Returns the data directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the location of `records.json`.
    #[inline]
    #[must_use]
    pub fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }

    /// Location of the temporary file a save writes before renaming.
    fn staging_path(&self) -> PathBuf {
        self.dir.join(format!("{RECORDS_FILE}.tmp"))
    }

    /// Runs `op` while holding the in-process guard and the file lock in
    /// `mode`.
    ///
    /// An unlock failure is reported only if `op` itself succeeded.
    fn locked<T, F: FnOnce() -> Result<T>>(&self, mode: LockMode, op: F) -> Result<T> {
        let _thread_guard = self
            .guard
            .lock()
            .map_err(|err| LedgerError::Storage(err.to_string().into()))?;
        let acquired = match mode {
            LockMode::Shared => self.lock_file.lock_shared(),
            LockMode::Exclusive => self.lock_file.lock(),
        };
        acquired.map_err(storage_io_error)?;

        let outcome = op();
        match (self.lock_file.unlock(), outcome) {
            (Err(err), Ok(_)) => Err(storage_io_error(err)),
            (Ok(()) | Err(_), result) => result,
        }
    }

    /// Reads `records.json`. A missing file is an empty collection.
    fn read_records(&self) -> Result<Vec<Record>> {
        let contents = match fs::read_to_string(self.records_path()) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(storage_io_error(err)),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replaces `records.json` through the staging file.
    ///
    /// The staging file is flushed to disk before the rename, so after a
    /// crash `records.json` holds either the old or the new collection.
    fn write_records(&self, records: &[Record]) -> Result<()> {
        let staging = self.staging_path();
        let target = self.records_path();
        let json = serde_json::to_vec_pretty(records)?;
        let mut file = fs::File::create(&staging).map_err(storage_io_error)?;
        file.write_all(&json).map_err(storage_io_error)?;
        file.sync_all().map_err(storage_io_error)?;
        drop(file);
        fs::rename(&staging, &target).map_err(storage_io_error)?;
        tracing::debug!(path = %target.display(), count = records.len(), "wrote records file");
        Ok(())
    }
}

/// Wraps an I/O failure as a storage error.
fn storage_io_error(err: std::io::Error) -> LedgerError {
    LedgerError::Storage(Box::new(err))
}

impl super::RecordStorage for FileStorage {
    #[inline]
    fn load(&self) -> Result<Vec<Record>> {
        self.locked(LockMode::Shared, || self.read_records())
    }

    #[inline]
    fn save(&self, records: &[Record]) -> Result<()> {
        self.locked(LockMode::Exclusive, || self.write_records(records))
    }
}
