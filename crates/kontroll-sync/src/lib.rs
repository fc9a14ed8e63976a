//! # kontroll-sync: Platform Clients and Sync Jobs
//!
//! The I/O half of the Kontroll sync system: REST clients for both platforms,
//! the paginated fetcher, the snapshot diff engine, the stock reconciler and
//! the four job entry points.
//!
//! ## Job Inventory
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Sync Jobs                                    │
//! │                                                                         │
//! │  catalog (scheduled)                                                   │
//! │    ERP products + FS materials ──► matcher ──► folder + material       │
//! │                                                 create on FS           │
//! │                                                                         │
//! │  stock_levels (scheduled)                                              │
//! │    ERP stock-on-hand ──► per-pair reconcile ──► ADD/ABATE movements    │
//! │                                                 on FS                  │
//! │                                                                         │
//! │  purchase_orders (scheduled)                                           │
//! │    ERP purchase orders ──► snapshot diff ──► store mutations +         │
//! │                                              notification              │
//! │                                                                         │
//! │  sales_orders (webhook)                                                │
//! │    FS failure stock tasks ──► sales-order payload ──► ERP create       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every job receives its clients, store and notifier as explicit handles -
//! constructed once per process by the worker and reused across runs.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clients;
pub mod error;
pub mod fetch;
pub mod jobs;
pub mod notify;
pub mod reconcile;
pub mod tracker;

// =============================================================================
// Re-exports
// =============================================================================

pub use clients::infraspeak::InfraspeakClient;
pub use clients::unleashed::UnleashedClient;
pub use error::{SyncError, SyncResult};
pub use notify::Notifier;
pub use tracker::TrackerOutcome;
