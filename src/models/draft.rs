//! User-entered draft of a sale, prior to commit.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::{Amount, DeliveryMethod, ImageRef, Record, RecordId};

/// Quantity used when the entered value is missing or not a positive
/// integer.
pub const DEFAULT_QUANTITY: u32 = 1;

/// Unvalidated form input for a new record.
///
/// Every field is optional and numeric fields are kept as the raw text
/// the user typed. [`crate::ledger::Ledger::commit`] resolves them
/// leniently: a missing or unreadable quantity becomes `1`, a missing or
/// unreadable amount becomes `0`, and an empty date becomes today.
///
/// # Examples
///
/// ```
/// use profitool::models::{DeliveryMethod, DraftInput};
///
/// let draft = DraftInput::new()
///     .item("Lamp")
///     .quantity("1")
///     .original_price("20")
///     .selling_price("35")
///     .method(DeliveryMethod::Shipped)
///     .shipping_cost("5");
/// assert_eq!(draft.item, "Lamp");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftInput {
    /// Item label.
    pub item: String,
    /// Units sold, as typed.
    pub quantity: String,
    /// Unit cost, as typed.
    pub original_price: String,
    /// Unit selling price, as typed.
    pub selling_price: String,
    /// Buyer label.
    pub buyer: String,
    /// Delivery method.
    pub method: DeliveryMethod,
    /// Shipping cost, as typed. Ignored unless shipped.
    pub shipping_cost: String,
    /// Free-text note; blank means none.
    pub remark: String,
    /// Sale date as `YYYY-MM-DD`; blank means today.
    pub date: String,
    /// Path of an attached image file.
    pub image: Option<PathBuf>,
}

impl DraftInput {
    /// Creates an empty draft.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the item label.
    #[inline]
    #[must_use]
    pub fn item<T: Into<String>>(mut self, value: T) -> Self {
        self.item = value.into();
        self
    }

    /// Sets the quantity text.
    #[inline]
    #[must_use]
    pub fn quantity<T: Into<String>>(mut self, value: T) -> Self {
        self.quantity = value.into();
        self
    }

    /// Sets the unit cost text.
    #[inline]
    #[must_use]
    pub fn original_price<T: Into<String>>(mut self, value: T) -> Self {
        self.original_price = value.into();
        self
    }

    /// Sets the unit selling price text.
    #[inline]
    #[must_use]
    pub fn selling_price<T: Into<String>>(mut self, value: T) -> Self {
        self.selling_price = value.into();
        self
    }

    /// Sets the buyer label.
    #[inline]
    #[must_use]
    pub fn buyer<T: Into<String>>(mut self, value: T) -> Self {
        self.buyer = value.into();
        self
    }

    /// Sets the delivery method.
    #[inline]
    #[must_use]
    pub const fn method(mut self, value: DeliveryMethod) -> Self {
        self.method = value;
        self
    }

    /// Sets the shipping cost text.
    #[inline]
    #[must_use]
    pub fn shipping_cost<T: Into<String>>(mut self, value: T) -> Self {
        self.shipping_cost = value.into();
        self
    }

    /// Sets the note.
    #[inline]
    #[must_use]
    pub fn remark<T: Into<String>>(mut self, value: T) -> Self {
        self.remark = value.into();
        self
    }

    /// Sets the sale date text.
    #[inline]
    #[must_use]
    pub fn date<T: Into<String>>(mut self, value: T) -> Self {
        self.date = value.into();
        self
    }

    /// Attaches an image file.
    #[inline]
    #[must_use]
    pub fn image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.image = Some(path.into());
        self
    }

    /// Resolves the draft into a finished record.
    pub(crate) fn into_record(self, id: RecordId, today: NaiveDate) -> Record {
        let quantity = parse_quantity(&self.quantity);
        let original_price = parse_amount("original_price", &self.original_price);
        let selling_price = parse_amount("selling_price", &self.selling_price);
        let shipping_cost = if self.method.is_shipped() {
            parse_amount("shipping_cost", &self.shipping_cost)
        } else {
            Amount::zero()
        };
        let profit = Record::compute_profit(
            &selling_price,
            &original_price,
            self.method,
            &shipping_cost,
            quantity,
        );
        let remark = (!self.remark.trim().is_empty()).then_some(self.remark);
        let date = parse_date(&self.date, today);
        let image = self
            .image
            .map(|path| ImageRef::new(path.display().to_string()));

        Record {
            id,
            item: self.item,
            quantity,
            original_price,
            selling_price,
            buyer: self.buyer,
            method: self.method,
            shipping_cost,
            remark,
            date,
            image,
            profit,
        }
    }
}

/// Reads a leading positive integer, falling back to [`DEFAULT_QUANTITY`].
///
/// Fractions are truncated (`"2.7"` is `2`); zero, negatives, overflow and
/// non-numeric text all fall back.
fn parse_quantity(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(quantity) if quantity > 0 => quantity,
        Ok(_) | Err(_) => {
            if !input.trim().is_empty() {
                tracing::debug!(input = %input, "quantity not a positive integer, using default");
            }
            DEFAULT_QUANTITY
        }
    }
}

/// Reads a non-negative amount, falling back to zero.
fn parse_amount(field: &'static str, input: &str) -> Amount {
    match Amount::parse_lenient(input) {
        Some(amount) if !amount.is_negative() => amount,
        Some(_) | None => {
            if !input.trim().is_empty() {
                tracing::debug!(field = field, input = %input, "amount not a non-negative number, using 0");
            }
            Amount::zero()
        }
    }
}

/// Reads an ISO date, falling back to `today`.
fn parse_date(input: &str, today: NaiveDate) -> NaiveDate {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return today;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").unwrap_or_else(|err| {
        tracing::warn!(input = %trimmed, error = %err, "unreadable sale date, using today");
        today
    })
}
