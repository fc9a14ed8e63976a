//! # Error Types
//!
//! Domain-specific error types for kontroll-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kontroll-core errors (this file)                                      │
//! │  └── CoreError   - Pure reconciliation failures                        │
//! │                                                                         │
//! │  kontroll-store errors (separate crate)                                │
//! │  └── StoreError  - Snapshot store failures                             │
//! │                                                                         │
//! │  kontroll-sync errors (separate crate)                                 │
//! │  └── SyncError   - Transport / lookup / job failures                   │
//! │                                                                         │
//! │  Flow: CoreError → SyncError → worker logs + generic failure response  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Pure reconciliation errors.
///
/// These represent inconsistencies in the data being reconciled, never I/O
/// failures (kontroll-core performs no I/O).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Both catalogs already agree; there is nothing to create.
    #[error("No unmatched products to process")]
    NoUnmatchedProducts,

    /// An unmatched code has no detail entry in the source catalog.
    ///
    /// ## When This Occurs
    /// The code listing and the detail listing come from the same feed, so
    /// this indicates the feed changed between pages or is inconsistent.
    #[error("Product not found in source catalog: {0}")]
    ProductNotFound(String),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::ProductNotFound("15.HBF-08-08".into()).to_string(),
            "Product not found in source catalog: 15.HBF-08-08"
        );
        assert_eq!(
            CoreError::NoUnmatchedProducts.to_string(),
            "No unmatched products to process"
        );
    }
}
