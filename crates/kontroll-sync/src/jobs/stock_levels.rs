//! # Stock Levels Job
//!
//! Pushes the ERP's on-hand quantities to the field-service platform as
//! ADD/ABATE movements, one per (product, warehouse) pair that drifted.
//!
//! The ERP is authoritative: the snapshot rows are rebuilt from scratch each
//! run (`StockOnHand` pages joined with per-product warehouse quantities and
//! the warehouse code mapping) and never persisted.

use std::collections::HashMap;

use tracing::{info, warn};

use kontroll_core::StockSnapshotRow;

use crate::clients::infraspeak::InfraspeakClient;
use crate::clients::unleashed::{ProductWarehouseQuantity, StockOnHandItem, UnleashedClient};
use crate::error::SyncResult;
use crate::fetch::fetch_all_pages;
use crate::reconcile::{reconcile_stock, AppliedMovement};

/// Stock levels job handle.
pub struct StockLevelsJob<'a> {
    pub erp: &'a UnleashedClient,
    pub field_service: &'a InfraspeakClient,
}

/// What a stock-levels run accomplished.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLevelsOutcome {
    /// (product, warehouse) pairs considered.
    pub pairs: usize,

    /// Movements actually posted.
    pub movements: Vec<AppliedMovement>,
}

impl StockLevelsJob<'_> {
    /// Runs one stock reconciliation pass.
    pub async fn run(&self) -> SyncResult<StockLevelsOutcome> {
        let rows = self.snapshot_rows().await?;
        let movements = reconcile_stock(&rows, self.field_service).await;

        Ok(StockLevelsOutcome {
            pairs: rows.len(),
            movements,
        })
    }

    /// Builds the transient stock snapshot from the ERP.
    async fn snapshot_rows(&self) -> SyncResult<Vec<StockSnapshotRow>> {
        let erp = self.erp;
        let stock_items = fetch_all_pages(move |page| erp.stock_on_hand_page(page)).await;

        // The warehouse GUID → code mapping is shared by every row; fetched
        // once per run.
        let codes_by_guid: HashMap<String, String> = self
            .erp
            .warehouses()
            .await?
            .into_iter()
            .map(|mapping| (mapping.external_id, mapping.code))
            .collect();

        let mut rows = Vec::new();
        for item in &stock_items {
            // A failed per-product lookup skips that product, not the run.
            match self.erp.warehouse_quantities(&item.product_guid).await {
                Ok(quantities) => {
                    rows.extend(rows_for_item(item, &quantities, &codes_by_guid));
                }
                Err(err) => {
                    warn!(
                        product_code = %item.product_code,
                        error = %err,
                        "Failed to fetch warehouse quantities"
                    );
                }
            }
        }

        info!(
            products = stock_items.len(),
            pairs = rows.len(),
            "Built stock snapshot"
        );
        Ok(rows)
    }
}

/// Joins one product's warehouse quantities with the warehouse code mapping.
///
/// Pairs whose warehouse GUID is unknown or whose code is not numeric are
/// dropped (the field-service platform addresses warehouses by numeric code).
fn rows_for_item(
    item: &StockOnHandItem,
    quantities: &[ProductWarehouseQuantity],
    codes_by_guid: &HashMap<String, String>,
) -> Vec<StockSnapshotRow> {
    quantities
        .iter()
        .filter_map(|quantity| {
            let code = codes_by_guid.get(&quantity.warehouse_guid)?;
            let warehouse_code = match code.trim().parse::<i64>() {
                Ok(code) => code,
                Err(_) => {
                    warn!(
                        product_code = %item.product_code,
                        warehouse_code = %code,
                        "Skipping non-numeric warehouse code"
                    );
                    return None;
                }
            };

            Some(StockSnapshotRow {
                product_code: item.product_code.clone(),
                warehouse_code,
                available_quantity: quantity.available_quantity,
                average_cost: item.average_cost,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str) -> StockOnHandItem {
        StockOnHandItem {
            product_guid: "prod-guid-1".into(),
            product_code: code.into(),
            average_cost: 2.5,
        }
    }

    fn quantity(guid: &str, qty: f64) -> ProductWarehouseQuantity {
        ProductWarehouseQuantity {
            warehouse_guid: guid.into(),
            available_quantity: qty,
        }
    }

    #[test]
    fn test_rows_join_quantities_with_codes() {
        let mapping: HashMap<String, String> = [
            ("wh-guid-16".to_string(), "16".to_string()),
            ("wh-guid-18".to_string(), "18".to_string()),
        ]
        .into();

        let rows = rows_for_item(
            &item("AB-1"),
            &[quantity("wh-guid-16", 10.0), quantity("wh-guid-18", 0.0)],
            &mapping,
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].warehouse_code, 16);
        assert_eq!(rows[0].available_quantity, 10.0);
        assert_eq!(rows[0].average_cost, 2.5);
        assert_eq!(rows[1].warehouse_code, 18);
    }

    #[test]
    fn test_unknown_warehouse_guid_is_dropped() {
        let mapping = HashMap::new();
        let rows = rows_for_item(&item("AB-1"), &[quantity("ghost", 5.0)], &mapping);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_non_numeric_warehouse_code_is_dropped() {
        let mapping: HashMap<String, String> =
            [("wh-guid".to_string(), "MAIN".to_string())].into();
        let rows = rows_for_item(&item("AB-1"), &[quantity("wh-guid", 5.0)], &mapping);
        assert!(rows.is_empty());
    }
}
