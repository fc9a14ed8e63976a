//! # Domain Types
//!
//! Core domain types shared by the sync jobs.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   CatalogEntry   │  │ StockSnapshotRow │  │ PurchaseOrderRecord  │  │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────────  │  │
//! │  │  code (identity) │  │  product_code    │  │  purchase_order_     │  │
//! │  │  description     │  │  warehouse_code  │  │    number (key)      │  │
//! │  │  average_cost    │  │  available_qty   │  │  status              │  │
//! │  │  warehouse_codes │  │  average_cost    │  │  last_modified_*     │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐                            │
//! │  │ WarehouseMapping │  │   StatusChange   │                            │
//! │  │  ──────────────  │  │  ──────────────  │                            │
//! │  │  external_id     │  │  old_status?     │                            │
//! │  │  code            │  │  new_status      │                            │
//! │  └──────────────────┘  └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Catalog entries are identified by their *normalized* product code
//! ([`crate::codes::normalize`]); purchase orders by their order number.

use serde::{Deserialize, Serialize};

use crate::TERMINAL_STATUS;

// =============================================================================
// Catalog Entry
// =============================================================================

/// A product as the ERP platform describes it.
///
/// Read-only from the sync jobs' perspective: the ERP owns these, the jobs
/// only mirror them into the field-service catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product code - business identifier, compared across platforms after
    /// normalization.
    pub code: String,

    /// Display name / description shown in the field-service catalog.
    pub description: String,

    /// Average landed cost, used as the material's mean price.
    pub average_cost: f64,

    /// Unit of measure label, when the ERP provides one.
    pub unit_of_measure: Option<String>,

    /// Product group name; groups become catalog folders.
    pub group: Option<String>,

    /// Numeric warehouse codes this product is stocked in.
    pub warehouse_codes: Vec<i64>,
}

// =============================================================================
// Warehouse Mapping
// =============================================================================

/// Static warehouse reference data, pulled fresh each run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseMapping {
    /// The platform's own identifier (a GUID on the ERP side).
    pub external_id: String,

    /// The warehouse code shared across platforms.
    pub code: String,
}

// =============================================================================
// Stock Snapshot Row
// =============================================================================

/// One (product, warehouse) on-hand quantity from the authoritative platform.
///
/// Transient: recomputed from the ERP on every stock-levels run, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshotRow {
    /// Product code (raw, normalized at comparison time).
    pub product_code: String,

    /// Numeric warehouse code shared with the field-service platform.
    pub warehouse_code: i64,

    /// Quantity on hand according to the ERP.
    pub available_quantity: f64,

    /// Average cost carried for reference.
    pub average_cost: f64,
}

// =============================================================================
// Purchase Order Record
// =============================================================================

/// A purchase order as tracked in the persisted snapshot.
///
/// ## Lifecycle
/// ```text
/// first sighting (non-terminal)  ──►  stored
/// status changes                 ──►  stored row updated
/// status reaches "Complete"      ──►  removed from the store
/// vanishes from the ERP feed     ──►  removed from the store
/// ```
/// The store never contains a record whose status is the terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseOrderRecord {
    /// Order number - unique key within the ERP.
    pub purchase_order_number: String,

    /// Platform-owned status string ("Open", "Placed", "Complete", ...).
    pub status: String,

    /// Human-readable last-modified timestamp.
    pub last_modified_on: String,

    /// User who last modified the order.
    pub last_modified_by: String,
}

impl PurchaseOrderRecord {
    /// Whether this record's status is the terminal state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status == TERMINAL_STATUS
    }
}

// =============================================================================
// Status Change
// =============================================================================

/// One observed purchase-order transition, produced per run and consumed by
/// the notification formatter. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub purchase_order_number: String,

    /// `None` when the order was seen for the first time.
    pub old_status: Option<String>,

    /// The new status, or the synthetic [`crate::STATUS_DELETED`].
    pub new_status: String,

    pub last_modified_on: String,
    pub last_modified_by: String,
}

// =============================================================================
// Stock Movements
// =============================================================================

/// Direction of a stock adjustment sent to the field-service platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementAction {
    /// Increase on-hand quantity.
    Add,
    /// Consume / decrease on-hand quantity.
    Abate,
}

impl MovementAction {
    /// The wire representation expected by the stock-movements endpoint.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementAction::Add => "ADD",
            MovementAction::Abate => "ABATE",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_status_detection() {
        let record = PurchaseOrderRecord {
            purchase_order_number: "PO-1".into(),
            status: "Complete".into(),
            last_modified_on: "2024-01-01 00:00:00".into(),
            last_modified_by: "ops".into(),
        };
        assert!(record.is_terminal());

        let open = PurchaseOrderRecord {
            status: "Open".into(),
            ..record
        };
        assert!(!open.is_terminal());
    }

    #[test]
    fn test_movement_action_wire_names() {
        assert_eq!(MovementAction::Add.as_str(), "ADD");
        assert_eq!(MovementAction::Abate.as_str(), "ABATE");
    }
}
