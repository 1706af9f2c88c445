//! Error types for the profit ledger.

/// All errors that can occur when using the ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// A year-month string was not in `YYYY-MM` form.
    #[error("invalid year-month {0:?}, expected YYYY-MM")]
    InvalidYearMonth(String),

    /// A delivery method label was not recognised.
    #[error("invalid delivery method {0:?}, expected COD or Ship")]
    InvalidDeliveryMethod(String),

    /// A decimal amount could not be parsed.
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = core::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = LedgerError::from(serde_err);
        assert!(matches!(err, LedgerError::Serialization(_)));
        let msg = err.to_string();
        assert!(msg.contains("serialization error"));
    }

    #[test]
    fn error_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only disk");
        let err = LedgerError::Storage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("read-only disk"));
    }

    #[test]
    fn error_invalid_year_month_display() {
        let err = LedgerError::InvalidYearMonth("2024/03".to_owned());
        assert_eq!(err.to_string(), r#"invalid year-month "2024/03", expected YYYY-MM"#);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LedgerError>();
    }
}
