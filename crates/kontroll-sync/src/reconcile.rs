//! # Stock Quantity Reconciler
//!
//! Brings the field-service platform's on-hand quantities in line with the
//! ERP's, one (product, warehouse) pair at a time.
//!
//! ## Fan-Out Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Per-Pair Reconciliation                            │
//! │                                                                         │
//! │  snapshot rows ──► all pairs dispatched concurrently (join_all)        │
//! │                                                                         │
//! │  each pair, sequentially and in isolation:                             │
//! │    1. find material id by normalized code (early-exit page scan)       │
//! │    2. read target quantity for (material, warehouse)                   │
//! │    3. delta = authoritative - target                                   │
//! │         > 0 ──► ADD movement                                           │
//! │         < 0 ──► ABATE movement                                         │
//! │         = 0 ──► nothing                                                │
//! │    4. post the movement                                                │
//! │                                                                         │
//! │  A lookup miss or failure on one pair is logged and dropped from the   │
//! │  result set - it never aborts the other pairs.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use kontroll_core::codes::normalize;
use kontroll_core::payloads::StockMovementPayload;
use kontroll_core::stock::movement_for;
use kontroll_core::{MovementAction, StockSnapshotRow};

use crate::error::SyncResult;

// =============================================================================
// Target seam
// =============================================================================

/// The field-service operations the reconciler needs.
///
/// Implemented by the real client; tests drive the reconciler through a fake.
#[async_trait]
pub trait StockTarget {
    /// Resolves a product code to the target's material id, or `None` when
    /// the material does not exist there.
    async fn find_material_id(&self, code: &str) -> SyncResult<Option<i64>>;

    /// The target's current on-hand quantity for a (material, warehouse)
    /// pair; 0 when the pair is unknown.
    async fn quantity_on_hand(&self, material_id: i64, warehouse_id: i64) -> SyncResult<f64>;

    /// Posts a stock adjustment.
    async fn apply_movement(&self, payload: &StockMovementPayload) -> SyncResult<()>;
}

// =============================================================================
// Results
// =============================================================================

/// One movement that was actually posted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMovement {
    pub product_code: String,
    pub material_id: i64,
    pub warehouse_id: i64,
    pub action: MovementAction,
    pub quantity: f64,
}

// =============================================================================
// Reconciler
// =============================================================================

/// Reconciles every snapshot row against the target platform.
///
/// Returns only the movements that were posted; equal quantities, unknown
/// materials and per-pair failures all drop out of the result (the latter two
/// with a log line).
pub async fn reconcile_stock<T>(rows: &[StockSnapshotRow], target: &T) -> Vec<AppliedMovement>
where
    T: StockTarget + Sync,
{
    info!(pairs = rows.len(), "Reconciling stock levels");

    let results = join_all(rows.iter().map(|row| reconcile_pair(row, target))).await;

    let applied: Vec<AppliedMovement> = results.into_iter().flatten().collect();
    info!(movements = applied.len(), "Stock reconciliation complete");
    applied
}

/// Reconciles a single (product, warehouse) pair; never propagates errors.
async fn reconcile_pair<T>(row: &StockSnapshotRow, target: &T) -> Option<AppliedMovement>
where
    T: StockTarget + Sync,
{
    let code = normalize(&row.product_code);

    match try_reconcile_pair(&code, row, target).await {
        Ok(applied) => applied,
        Err(err) => {
            warn!(
                product_code = %code,
                warehouse_id = row.warehouse_code,
                error = %err,
                "Failed to reconcile stock pair"
            );
            None
        }
    }
}

async fn try_reconcile_pair<T>(
    code: &str,
    row: &StockSnapshotRow,
    target: &T,
) -> SyncResult<Option<AppliedMovement>>
where
    T: StockTarget + Sync,
{
    let Some(material_id) = target.find_material_id(code).await? else {
        warn!(product_code = %code, "Material not found on target platform");
        return Ok(None);
    };

    let target_quantity = target
        .quantity_on_hand(material_id, row.warehouse_code)
        .await?;

    let Some(delta) = movement_for(row.available_quantity, target_quantity) else {
        debug!(
            product_code = %code,
            warehouse_id = row.warehouse_code,
            "Quantities already match, no movement needed"
        );
        return Ok(None);
    };

    let payload =
        StockMovementPayload::new(delta.action, material_id, delta.quantity, row.warehouse_code);
    target.apply_movement(&payload).await?;

    info!(
        product_code = %code,
        warehouse_id = row.warehouse_code,
        action = delta.action.as_str(),
        quantity = delta.quantity,
        "Posted stock movement"
    );

    Ok(Some(AppliedMovement {
        product_code: code.to_string(),
        material_id,
        warehouse_id: row.warehouse_code,
        action: delta.action,
        quantity: delta.quantity,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted fake target: code → material id, (material, warehouse) → qty.
    #[derive(Default)]
    struct FakeTarget {
        materials: HashMap<String, i64>,
        quantities: HashMap<(i64, i64), f64>,
        failing_codes: Vec<String>,
        posted: Mutex<Vec<StockMovementPayload>>,
    }

    #[async_trait]
    impl StockTarget for FakeTarget {
        async fn find_material_id(&self, code: &str) -> SyncResult<Option<i64>> {
            if self.failing_codes.iter().any(|c| c == code) {
                return Err(SyncError::Api {
                    status: 500,
                    body: "lookup exploded".into(),
                });
            }
            Ok(self.materials.get(code).copied())
        }

        async fn quantity_on_hand(&self, material_id: i64, warehouse_id: i64) -> SyncResult<f64> {
            Ok(self
                .quantities
                .get(&(material_id, warehouse_id))
                .copied()
                .unwrap_or(0.0))
        }

        async fn apply_movement(&self, payload: &StockMovementPayload) -> SyncResult<()> {
            self.posted.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn row(code: &str, warehouse: i64, quantity: f64) -> StockSnapshotRow {
        StockSnapshotRow {
            product_code: code.into(),
            warehouse_code: warehouse,
            available_quantity: quantity,
            average_cost: 1.0,
        }
    }

    #[tokio::test]
    async fn test_target_behind_gets_add_movement() {
        let target = FakeTarget {
            materials: HashMap::from([("AB-1".into(), 100)]),
            quantities: HashMap::from([((100, 16), 3.0)]),
            ..Default::default()
        };

        let applied = reconcile_stock(&[row("ab-1", 16, 10.0)], &target).await;

        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].action, MovementAction::Add);
        assert_eq!(applied[0].quantity, 7.0);

        let posted = target.posted.lock().unwrap();
        assert_eq!(posted[0].action, "ADD");
        assert_eq!(posted[0].stocks[0].quantity, 7.0);
    }

    #[tokio::test]
    async fn test_target_ahead_gets_abate_movement() {
        let target = FakeTarget {
            materials: HashMap::from([("AB-1".into(), 100)]),
            quantities: HashMap::from([((100, 16), 10.0)]),
            ..Default::default()
        };

        let applied = reconcile_stock(&[row("AB-1", 16, 3.0)], &target).await;

        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].action, MovementAction::Abate);
        assert_eq!(applied[0].quantity, 7.0);
    }

    #[tokio::test]
    async fn test_equal_quantities_post_nothing() {
        let target = FakeTarget {
            materials: HashMap::from([("AB-1".into(), 100)]),
            quantities: HashMap::from([((100, 16), 5.0)]),
            ..Default::default()
        };

        let applied = reconcile_stock(&[row("AB-1", 16, 5.0)], &target).await;

        assert!(applied.is_empty());
        assert!(target.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_material_is_skipped() {
        let target = FakeTarget::default();

        let applied = reconcile_stock(&[row("GHOST", 16, 5.0)], &target).await;
        assert!(applied.is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_pair_does_not_abort_the_rest() {
        let target = FakeTarget {
            materials: HashMap::from([("OK-1".into(), 100), ("BAD-1".into(), 200)]),
            quantities: HashMap::from([((100, 16), 0.0)]),
            failing_codes: vec!["BAD-1".into()],
            ..Default::default()
        };

        let applied = reconcile_stock(
            &[row("BAD-1", 16, 4.0), row("OK-1", 16, 2.0)],
            &target,
        )
        .await;

        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].product_code, "OK-1");
    }

    #[tokio::test]
    async fn test_codes_are_normalized_before_lookup() {
        let target = FakeTarget {
            materials: HashMap::from([("AB-1".into(), 100)]),
            ..Default::default()
        };

        let applied = reconcile_stock(&[row("  ab-1  ", 16, 1.0)], &target).await;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].product_code, "AB-1");
    }
}
