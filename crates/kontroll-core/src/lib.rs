//! # kontroll-core: Pure Reconciliation Logic
//!
//! This crate is the **heart** of the Kontroll sync jobs. It contains the
//! reconciliation logic shared by every job variant as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kontroll Sync Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/sync-worker                               │   │
//! │  │    scheduler ──► jobs ──► webhook listener ──► notifier        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kontroll-sync (clients + jobs)                 │   │
//! │  │    paginated fetch, HMAC signing, diff engine, reconciler      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kontroll-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   codes   │  │  matcher  │  │   diff    │  │   stock   │  │   │
//! │  │   │ normalize │  │ unmatched │  │   plan    │  │  deltas   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogEntry, PurchaseOrderRecord, etc.)
//! - [`codes`] - Product code normalization
//! - [`matcher`] - Cross-platform set-difference matching
//! - [`diff`] - Purchase-order snapshot diff classification
//! - [`stock`] - Stock quantity delta arithmetic
//! - [`payloads`] - Platform write-payload builders
//! - [`dates`] - ERP wire timestamp handling
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Normalize before comparing**: identifiers cross platform boundaries only
//!    through [`codes::normalize`]
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codes;
pub mod dates;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod payloads;
pub mod stock;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kontroll_core::PurchaseOrderRecord` instead of
// `use kontroll_core::types::PurchaseOrderRecord`

pub use error::{CoreError, CoreResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The terminal purchase-order status.
///
/// ## Why a constant?
/// The ERP owns the status vocabulary, so statuses stay open strings; only the
/// terminal state has special meaning to the tracker (records reaching it are
/// removed rather than retained).
pub const TERMINAL_STATUS: &str = "Complete";

/// Synthetic status emitted when a tracked purchase order disappears from the
/// ERP feed. Never stored, only reported.
pub const STATUS_DELETED: &str = "Deleted";

/// Folder used for catalog entries whose product group is missing.
pub const DEFAULT_FOLDER: &str = "DEFAULTFOLDER";
