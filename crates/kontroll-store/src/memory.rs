//! # In-Memory Snapshot Store
//!
//! A [`PurchaseOrderStore`] backed by a plain map. Used by the tracker's unit
//! tests and by dry runs; never by the production worker.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use kontroll_core::PurchaseOrderRecord;

use crate::error::StoreResult;
use crate::repository::PurchaseOrderStore;

/// Map-backed store keyed by order number.
///
/// BTreeMap keeps `scan_all` deterministic, which the tests rely on.
#[derive(Debug, Default)]
pub struct MemoryPurchaseOrderStore {
    records: Mutex<BTreeMap<String, PurchaseOrderRecord>>,
}

impl MemoryPurchaseOrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given records.
    pub fn with_records(records: impl IntoIterator<Item = PurchaseOrderRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.purchase_order_number.clone(), record))
            .collect();
        MemoryPurchaseOrderStore {
            records: Mutex::new(map),
        }
    }

    /// Current contents, in key order.
    pub fn snapshot(&self) -> Vec<PurchaseOrderRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    /// Whether a record with the given order number is tracked.
    pub fn contains(&self, purchase_order_number: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .contains_key(purchase_order_number)
    }
}

#[async_trait]
impl PurchaseOrderStore for MemoryPurchaseOrderStore {
    async fn scan_all(&self) -> StoreResult<Vec<PurchaseOrderRecord>> {
        Ok(self.snapshot())
    }

    async fn put(&self, record: &PurchaseOrderRecord) -> StoreResult<()> {
        self.records
            .lock()
            .unwrap()
            .insert(record.purchase_order_number.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, purchase_order_number: &str) -> StoreResult<()> {
        self.records.lock().unwrap().remove(purchase_order_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: &str, status: &str) -> PurchaseOrderRecord {
        PurchaseOrderRecord {
            purchase_order_number: number.into(),
            status: status.into(),
            last_modified_on: "2024-03-01 09:30:00".into(),
            last_modified_by: "buyer".into(),
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryPurchaseOrderStore::new();

        store.put(&record("PO-2", "Open")).await.unwrap();
        store.put(&record("PO-1", "Placed")).await.unwrap();

        let all = store.scan_all().await.unwrap();
        assert_eq!(all.len(), 2);
        // BTreeMap ordering
        assert_eq!(all[0].purchase_order_number, "PO-1");

        store.delete("PO-1").await.unwrap();
        assert!(!store.contains("PO-1"));
        assert!(store.contains("PO-2"));
    }
}
