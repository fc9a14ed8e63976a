//! # Repositories
//!
//! The [`PurchaseOrderStore`] trait is the seam the status tracker is written
//! against: a key-value view of tracked purchase orders supporting scan-all,
//! put-item and delete-item, keyed by order number.
//!
//! Implementations:
//! - [`purchase_order::PurchaseOrderRepository`] - SQLite-backed (production)
//! - [`crate::memory::MemoryPurchaseOrderStore`] - in-memory (tests)

use async_trait::async_trait;

use kontroll_core::PurchaseOrderRecord;

use crate::error::StoreResult;

pub mod purchase_order;

/// Abstract purchase-order snapshot store.
///
/// Mutations commit independently - there is no transaction spanning a
/// tracker run, so callers must treat a failed mutation as aborting the run.
#[async_trait]
pub trait PurchaseOrderStore: Send + Sync {
    /// Returns every tracked record.
    async fn scan_all(&self) -> StoreResult<Vec<PurchaseOrderRecord>>;

    /// Inserts or overwrites the record keyed by its order number.
    async fn put(&self, record: &PurchaseOrderRecord) -> StoreResult<()>;

    /// Removes the record with the given order number, if present.
    async fn delete(&self, purchase_order_number: &str) -> StoreResult<()>;
}
