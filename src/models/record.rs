//! Committed sale record.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Amount, DeliveryMethod, ImageRef, RecordId, YearMonth};

/// A single committed sale with its profit.
///
/// Records are created only by [`crate::ledger::Ledger::commit`] and are
/// never edited afterwards, so every field is read through an accessor.
/// The profit is computed once at commit time and stored.
///
/// The attached image reference is session-scoped and is skipped during
/// serialization; every other field round-trips through storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier, increasing in creation order.
    pub(crate) id: RecordId,
    /// Free-text item label.
    pub(crate) item: String,
    /// Units sold (at least 1).
    pub(crate) quantity: u32,
    /// Unit cost paid by the seller.
    pub(crate) original_price: Amount,
    /// Unit price paid by the buyer.
    pub(crate) selling_price: Amount,
    /// Free-text buyer label.
    pub(crate) buyer: String,
    /// Delivery method.
    pub(crate) method: DeliveryMethod,
    /// Per-unit shipping cost; zero unless shipped.
    pub(crate) shipping_cost: Amount,
    /// Optional note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) remark: Option<String>,
    /// Sale date (yyyy-MM-dd).
    pub(crate) date: NaiveDate,
    /// Attached image, valid for the current session only.
    #[serde(skip)]
    pub(crate) image: Option<ImageRef>,
    /// Profit computed at commit time.
    pub(crate) profit: Amount,
}

impl Record {
    /// Computes the profit of a sale.
    ///
    /// `(selling − original − shipping) × quantity`, where the shipping
    /// cost only counts for [`DeliveryMethod::Shipped`]. The result is
    /// rounded to two decimal places.
    #[must_use]
    pub fn compute_profit(
        selling_price: &Amount,
        original_price: &Amount,
        method: DeliveryMethod,
        shipping_cost: &Amount,
        quantity: u32,
    ) -> Amount {
        let shipping = if method.is_shipped() {
            shipping_cost.as_decimal().clone()
        } else {
            BigDecimal::from(0_i32)
        };
        let margin = selling_price.as_decimal() - original_price.as_decimal() - shipping;
        Amount::from_decimal(&(margin * BigDecimal::from(quantity)))
    }

    /// Returns the record identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the item label.
    #[inline]
    #[must_use]
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Returns the number of units sold.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit cost paid by the seller.
    #[inline]
    #[must_use]
    pub const fn original_price(&self) -> &Amount {
        &self.original_price
    }

    /// Returns the unit price paid by the buyer.
    #[inline]
    #[must_use]
    pub const fn selling_price(&self) -> &Amount {
        &self.selling_price
    }

    /// Returns the buyer label.
    #[inline]
    #[must_use]
    pub fn buyer(&self) -> &str {
        &self.buyer
    }

    /// Returns the delivery method.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> DeliveryMethod {
        self.method
    }

    /// Returns the shipping cost (zero for cash on delivery).
    #[inline]
    #[must_use]
    pub const fn shipping_cost(&self) -> &Amount {
        &self.shipping_cost
    }

    /// Returns the note, if any.
    #[inline]
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    /// Returns the sale date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the month of the sale date.
    #[inline]
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    /// Returns the attached image for this session, if any.
    #[inline]
    #[must_use]
    pub const fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Returns the stored profit.
    #[inline]
    #[must_use]
    pub const fn profit(&self) -> &Amount {
        &self.profit
    }
}

/// Builds a record with the given identity, date and profit.
#[cfg(test)]
pub(crate) fn test_record(id: i64, date: &str, profit: &str) -> Record {
    Record {
        id: RecordId::new(id),
        item: format!("item-{id}"),
        quantity: 1,
        original_price: Amount::zero(),
        selling_price: profit.parse().unwrap(),
        buyer: String::new(),
        method: DeliveryMethod::CashOnDelivery,
        shipping_cost: Amount::zero(),
        remark: None,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        image: None,
        profit: profit.parse().unwrap(),
    }
}
