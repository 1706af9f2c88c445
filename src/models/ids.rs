//! Identifier and reference newtypes for records.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a ledger record.
///
/// Issued by the ledger at commit time from the creation timestamp in
/// milliseconds, bumped past the last issued value when two commits land
/// in the same millisecond. Stored as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Session-scoped reference to an image attached to a record.
///
/// Holds the location of the attached file as given by the caller. It is
/// never written to storage, so a restored record has no image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wraps the location of an attached file.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(location: T) -> Self {
        Self(location.into())
    }

    /// Returns the file location.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
