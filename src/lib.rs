//! Personal sales-profit ledger.
//!
//! Record sales as they happen, let the crate work out what each one
//! earned, and ask for totals by day, by month or for all time. The record
//! collection is kept newest first and written back to storage after every
//! change.
//!
//! ```
//! use profitool::ledger::Ledger;
//! use profitool::models::DraftInput;
//! use profitool::storage::InMemoryStorage;
//!
//! let mut ledger = Ledger::open(InMemoryStorage::new());
//! let record = ledger
//!     .commit(
//!         DraftInput::new()
//!             .item("Mug")
//!             .quantity("2")
//!             .original_price("5")
//!             .selling_price("12"),
//!     )
//!     .unwrap();
//! assert_eq!(record.profit().to_string(), "14.00");
//! ```

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod models;
pub mod storage;
