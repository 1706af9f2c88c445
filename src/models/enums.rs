//! Enumeration types for constrained record values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// How a sold item reaches the buyer.
///
/// Stored and displayed as the short labels `"COD"` and `"Ship"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Handed over in person and paid on delivery. No shipping cost.
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
    /// Posted to the buyer. The seller's shipping cost reduces the profit.
    #[serde(rename = "Ship")]
    Shipped,
}

impl DeliveryMethod {
    /// Returns the short label used in storage and on screen.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "COD",
            Self::Shipped => "Ship",
        }
    }

    /// Returns `true` if a shipping cost applies to this method.
    #[inline]
    #[must_use]
    pub const fn is_shipped(self) -> bool {
        matches!(self, Self::Shipped)
    }
}

impl fmt::Display for DeliveryMethod {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeliveryMethod {
    type Err = LedgerError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" | "cash-on-delivery" | "cash_on_delivery" => Ok(Self::CashOnDelivery),
            "ship" | "shipped" | "shipping" => Ok(Self::Shipped),
            _ => Err(LedgerError::InvalidDeliveryMethod(s.to_owned())),
        }
    }
}
