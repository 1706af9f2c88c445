//! Filtering and profit totals over record sequences.
//!
//! Everything here is a pure function of its input. Filters keep the
//! input order, so a newest-first collection yields newest-first views.
//!
//! The functions accept any iterable whose items borrow a [`Record`],
//! which covers both `&[Record]` and the `Vec<&Record>` returned by
//! another filter:
//!
//! ```
//! use profitool::aggregate::{filter_by_date, filter_by_month, total_profit};
//! use profitool::models::{NaiveDate, Record, YearMonth};
//!
//! let records: Vec<Record> = Vec::new();
//! let march = filter_by_month(&records, YearMonth::new(2024, 3).unwrap());
//! let ides = filter_by_date(march, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
//! assert_eq!(total_profit(ides).to_string(), "0.00");
//! ```

use core::borrow::Borrow;
use core::fmt;

use chrono::NaiveDate;

use crate::models::{Amount, Record, YearMonth};

/// Returns the records dated exactly `date`.
#[inline]
pub fn filter_by_date<I, R>(records: I, date: NaiveDate) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: Borrow<Record>,
{
    records
        .into_iter()
        .filter(|item| record_of(item).date() == date)
        .collect()
}

/// Returns the records whose date falls in `year_month`.
#[inline]
pub fn filter_by_month<I, R>(records: I, year_month: YearMonth) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: Borrow<Record>,
{
    records
        .into_iter()
        .filter(|item| year_month.contains(record_of(item).date()))
        .collect()
}

/// Sums the stored profits, rounded to two decimal places.
///
/// An empty sequence totals `0.00`.
#[inline]
pub fn total_profit<I, R>(records: I) -> Amount
where
    I: IntoIterator<Item = R>,
    R: Borrow<Record>,
{
    records
        .into_iter()
        .map(|item| record_of(&item).profit().clone())
        .sum()
}

/// Borrows the record behind an iterator item.
fn record_of<R: Borrow<Record>>(item: &R) -> &Record {
    item.borrow()
}

/// One of the three ways of looking at the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Every record.
    All,
    /// Records of a single day.
    Day(NaiveDate),
    /// Records of a single calendar month.
    Month(YearMonth),
}

impl View {
    /// Returns the records visible in this view, in input order.
    #[inline]
    pub fn apply<I, R>(self, records: I) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
        R: Borrow<Record>,
    {
        match self {
            Self::All => records.into_iter().collect(),
            Self::Day(date) => filter_by_date(records, date),
            Self::Month(year_month) => filter_by_month(records, year_month),
        }
    }
}

impl fmt::Display for View {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::All => f.write_str("all time"),
            Self::Day(date) => write!(f, "{date}"),
            Self::Month(year_month) => write!(f, "{year_month}"),
        }
    }
}

/// Records visible in a view together with their total profit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary<'a> {
    /// View the summary was computed for.
    pub view: View,
    /// Visible records, in input order.
    pub records: Vec<&'a Record>,
    /// Sum of the visible records' profits.
    pub total: Amount,
}

/// Filters `records` through `view` and totals the result.
#[inline]
pub fn summarize<'a, I>(records: I, view: View) -> Summary<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let visible = view.apply(records);
    let total = total_profit(visible.iter().copied());
    Summary {
        view,
        records: visible,
        total,
    }
}
