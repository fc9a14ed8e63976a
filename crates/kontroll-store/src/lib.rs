//! # kontroll-store: Purchase-Order Snapshot Store
//!
//! Persistence for the purchase-order status tracker. The tracker compares
//! each fresh ERP feed against the snapshot held here and mutates it record
//! by record.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Data Flow                                 │
//! │                                                                         │
//! │  kontroll-sync::tracker (diff engine)                                  │
//! │       │  scan_all / put / delete                                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  kontroll-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────────┐   ┌────────────┐  │   │
//! │  │   │   Database    │   │ PurchaseOrderStore │   │ Migrations │  │   │
//! │  │   │   (pool.rs)   │   │ (trait seam)       │   │ (embedded) │  │   │
//! │  │   │               │   │                    │   │            │  │   │
//! │  │   │ SqlitePool    │◄──│ sqlite repository  │   │ 001_...sql │  │   │
//! │  │   │ WAL mode      │   │ in-memory (tests)  │   │            │  │   │
//! │  │   └───────────────┘   └────────────────────┘   └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Store Seam
//!
//! The tracker only sees [`PurchaseOrderStore`] - scan-all, put-item,
//! delete-item, keyed by order number. The production implementation is the
//! SQLite-backed [`PurchaseOrderRepository`]; [`MemoryPurchaseOrderStore`]
//! exists for tests and dry runs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kontroll_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/kontroll.db")).await?;
//! let snapshot = db.purchase_orders().scan_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use memory::MemoryPurchaseOrderStore;
pub use pool::{Database, DbConfig};
pub use repository::purchase_order::PurchaseOrderRepository;
pub use repository::PurchaseOrderStore;
