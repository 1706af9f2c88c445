//! Data models for the profit ledger.
//!
//! This module contains the committed [`Record`], the user-entered
//! [`DraftInput`] it is built from, the decimal [`Amount`] used for every
//! money field, and the small value types around them.

mod amount;
mod draft;
mod enums;
mod ids;
mod record;
mod year_month;

pub use amount::{Amount, SCALE};
pub use chrono::NaiveDate;
pub use draft::{DEFAULT_QUANTITY, DraftInput};
pub use enums::DeliveryMethod;
pub use ids::{ImageRef, RecordId};
pub use record::Record;
#[cfg(test)]
pub(crate) use record::test_record;
pub use year_month::YearMonth;
