//! # Purchase-Order Snapshot Repository
//!
//! SQLite implementation of the snapshot store.
//!
//! ## The Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Store Usage                                 │
//! │                                                                         │
//! │  TRACKER RUN (purchase_orders job)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. scan_all()          ← previously observed orders                   │
//! │  2. diff vs. fresh feed ← pure classification (kontroll-core)          │
//! │  3. put()/delete()      ← one independent mutation per action          │
//! │                                                                         │
//! │  KEY GUARANTEES:                                                       │
//! │  • Keyed by purchase_order_number (PRIMARY KEY upsert)                 │
//! │  • Terminal-status records are deleted, never stored                   │
//! │  • No transaction spans a run - a failed mutation aborts the run       │
//! │    and the next run re-converges from whatever was committed           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use kontroll_core::PurchaseOrderRecord;

use crate::error::StoreResult;
use crate::repository::PurchaseOrderStore;

/// Repository for the persisted purchase-order snapshot.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    pool: SqlitePool,
}

impl PurchaseOrderRepository {
    /// Creates a new PurchaseOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseOrderRepository { pool }
    }

    /// Returns every tracked record, in order-number order.
    pub async fn scan_all(&self) -> StoreResult<Vec<PurchaseOrderRecord>> {
        let records = sqlx::query_as::<_, PurchaseOrderRecord>(
            r#"
            SELECT
                purchase_order_number,
                status,
                last_modified_on,
                last_modified_by
            FROM purchase_orders
            ORDER BY purchase_order_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Inserts or overwrites a record (PRIMARY KEY upsert).
    pub async fn put(&self, record: &PurchaseOrderRecord) -> StoreResult<()> {
        debug!(
            purchase_order_number = %record.purchase_order_number,
            status = %record.status,
            "Storing purchase order"
        );

        sqlx::query(
            r#"
            INSERT INTO purchase_orders (
                purchase_order_number, status, last_modified_on, last_modified_by
            ) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(purchase_order_number) DO UPDATE SET
                status = excluded.status,
                last_modified_on = excluded.last_modified_on,
                last_modified_by = excluded.last_modified_by
            "#,
        )
        .bind(&record.purchase_order_number)
        .bind(&record.status)
        .bind(&record.last_modified_on)
        .bind(&record.last_modified_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a record by order number. Deleting an absent key is a no-op.
    pub async fn delete(&self, purchase_order_number: &str) -> StoreResult<()> {
        debug!(purchase_order_number, "Deleting purchase order");

        sqlx::query("DELETE FROM purchase_orders WHERE purchase_order_number = ?1")
            .bind(purchase_order_number)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts tracked records.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase_orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl PurchaseOrderStore for PurchaseOrderRepository {
    async fn scan_all(&self) -> StoreResult<Vec<PurchaseOrderRecord>> {
        PurchaseOrderRepository::scan_all(self).await
    }

    async fn put(&self, record: &PurchaseOrderRecord) -> StoreResult<()> {
        PurchaseOrderRepository::put(self, record).await
    }

    async fn delete(&self, purchase_order_number: &str) -> StoreResult<()> {
        PurchaseOrderRepository::delete(self, purchase_order_number).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn record(number: &str, status: &str) -> PurchaseOrderRecord {
        PurchaseOrderRecord {
            purchase_order_number: number.into(),
            status: status.into(),
            last_modified_on: "2024-03-01 09:30:00".into(),
            last_modified_by: "buyer".into(),
        }
    }

    async fn repo() -> PurchaseOrderRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.purchase_orders()
    }

    #[tokio::test]
    async fn test_put_then_scan() {
        let repo = repo().await;

        repo.put(&record("PO-1", "Open")).await.unwrap();
        repo.put(&record("PO-2", "Placed")).await.unwrap();

        let all = repo.scan_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].purchase_order_number, "PO-1");
        assert_eq!(all[1].status, "Placed");
    }

    #[tokio::test]
    async fn test_put_overwrites_by_key() {
        let repo = repo().await;

        repo.put(&record("PO-1", "Open")).await.unwrap();
        repo.put(&record("PO-1", "Costed")).await.unwrap();

        let all = repo.scan_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, "Costed");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;

        repo.put(&record("PO-1", "Open")).await.unwrap();
        repo.delete("PO-1").await.unwrap();

        assert!(repo.scan_all().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let repo = repo().await;
        repo.delete("PO-GHOST").await.unwrap();
    }
}
