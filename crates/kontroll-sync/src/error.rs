//! # Sync Error Types
//!
//! Error types for the sync jobs.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │   Lookup        │  │     Store               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Http           │  │  MaterialNot    │  │  Store (aborts the     │ │
//! │  │  Api { status } │  │    Found        │  │  tracker run)          │ │
//! │  │  InvalidUrl     │  │  MissingData    │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Transport and lookup failures degrade per page / per item;            │
//! │  store failures are fatal to the run that hit them.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering transport, lookup, store and notification
/// failures.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// A configured base URL or joined endpoint is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// Expected entity absent from the target platform.
    #[error("Material not found for product code: {code}")]
    MaterialNotFound { code: String },

    /// A feed was missing data the job cannot proceed without.
    #[error("Missing data: {0}")]
    MissingData(String),

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Snapshot store access failed. Fatal to the tracker run: a partially
    /// applied diff must not be notified on.
    #[error("Store error: {0}")]
    Store(#[from] kontroll_store::StoreError),

    // =========================================================================
    // Other
    // =========================================================================
    /// Pure reconciliation failure bubbled up from kontroll-core.
    #[error(transparent)]
    Core(#[from] kontroll_core::CoreError),

    /// Payload (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Notification publish failed.
    #[error("Notification failed: {0}")]
    Notify(String),
}

impl SyncError {
    /// True for transport-category failures (taxonomy bucket a).
    ///
    /// These degrade to partial results in the paginated fetcher and to
    /// skipped items in the stock reconciler instead of failing the job.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SyncError::Http(_) | SyncError::Api { .. } | SyncError::InvalidUrl(_)
        )
    }

    /// True for lookup-miss failures (taxonomy bucket b).
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            SyncError::MaterialNotFound { .. } | SyncError::MissingData(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorization() {
        let api = SyncError::Api {
            status: 503,
            body: "unavailable".into(),
        };
        assert!(api.is_transport());
        assert!(!api.is_lookup_miss());

        let miss = SyncError::MaterialNotFound {
            code: "AB-1".into(),
        };
        assert!(miss.is_lookup_miss());
        assert!(!miss.is_transport());
    }

    #[test]
    fn test_display_includes_context() {
        let err = SyncError::Api {
            status: 404,
            body: "no such endpoint".into(),
        };
        assert_eq!(err.to_string(), "API error 404: no such endpoint");
    }
}
