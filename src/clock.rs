//! Time source used for record ids and default sale dates.

use chrono::{Local, NaiveDate};

/// Supplies the current time to the ledger.
pub trait Clock: core::fmt::Debug {
    /// Returns the current calendar date.
    fn today(&self) -> NaiveDate;

    /// Returns the current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    #[inline]
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Clock frozen at a given date and instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    /// Date reported by [`Clock::today`].
    today: NaiveDate,
    /// Instant reported by [`Clock::now_millis`].
    millis: i64,
}

impl FixedClock {
    /// Creates a clock that always reports `today` and `millis`.
    #[inline]
    #[must_use]
    pub const fn new(today: NaiveDate, millis: i64) -> Self {
        Self { today, millis }
    }
}

impl Clock for FixedClock {
    #[inline]
    fn today(&self) -> NaiveDate {
        self.today
    }

    #[inline]
    fn now_millis(&self) -> i64 {
        self.millis
    }
}
