//! # Platform Write Payloads
//!
//! Pure builders mapping validated internal records into the exact nested
//! JSON each platform's write endpoint requires. No side effects, no I/O;
//! identical inputs always produce identical payloads (the golden tests below
//! pin the shapes).
//!
//! ## Payload Inventory
//! ```text
//! ┌───────────────────────────┬────────────────────────────────────────────┐
//! │ Field-service platform    │ FolderPayload      POST materials          │
//! │                           │ MaterialPayload    POST materials          │
//! │                           │ StockMovementPayload POST stock-movements  │
//! ├───────────────────────────┼────────────────────────────────────────────┤
//! │ ERP platform              │ SalesOrderPayload  POST SalesOrders/{guid} │
//! └───────────────────────────┴────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use uuid::Uuid;

use crate::types::{CatalogEntry, MovementAction};

// =============================================================================
// Material / Folder (field-service catalog)
// =============================================================================

/// Per-warehouse association row carried by folder and material creates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialWarehouseRow {
    pub warehouse_id: i64,
    pub min_stock: i64,
    pub mean_price: f64,
    pub observation: &'static str,
}

fn warehouse_rows(warehouse_ids: &[i64]) -> Vec<MaterialWarehouseRow> {
    warehouse_ids
        .iter()
        .map(|&warehouse_id| MaterialWarehouseRow {
            warehouse_id,
            min_stock: 1,
            mean_price: 0.0,
            observation: "string",
        })
        .collect()
}

/// Create payload for a catalog grouping folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderPayload {
    #[serde(rename = "_type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub code: String,
    pub observation: &'static str,
    pub mean_price: f64,
    pub units: &'static str,
    pub material_warehouse: Vec<MaterialWarehouseRow>,
    pub default_sell_price: i64,
    pub default_sell_vat: i64,
}

impl FolderPayload {
    pub fn new(code: impl Into<String>, warehouse_ids: &[i64]) -> Self {
        FolderPayload {
            kind: "FOLDER",
            name: "Folder",
            code: code.into(),
            observation: "",
            mean_price: 0.0,
            units: "",
            material_warehouse: warehouse_rows(warehouse_ids),
            default_sell_price: 0,
            default_sell_vat: 0,
        }
    }
}

/// Create payload for a leaf material under a folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialPayload {
    #[serde(rename = "_type")]
    pub kind: &'static str,
    pub name: String,
    pub code: String,
    pub observation: &'static str,
    pub mean_price: f64,
    pub units: &'static str,
    pub material_warehouse: Vec<MaterialWarehouseRow>,
    pub parent_id: i64,
    pub default_sell_price: i64,
    pub default_sell_vat: i64,
}

impl MaterialPayload {
    pub fn new(entry: &CatalogEntry, parent_id: i64, warehouse_ids: &[i64]) -> Self {
        MaterialPayload {
            kind: "MATERIAL",
            name: entry.description.clone(),
            code: entry.code.clone(),
            observation: "",
            mean_price: entry.average_cost,
            units: "un",
            material_warehouse: warehouse_rows(warehouse_ids),
            parent_id,
            default_sell_price: 0,
            default_sell_vat: 0,
        }
    }
}

// =============================================================================
// Stock Movement (field-service stock)
// =============================================================================

/// One material/quantity pair inside a stock movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLine {
    pub material_id: i64,
    pub quantity: f64,
}

/// Signed stock adjustment sent to the stock-movements endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMovementPayload {
    #[serde(rename = "_type")]
    pub kind: &'static str,
    pub action: &'static str,
    pub warehouse_id: i64,
    pub stocks: Vec<StockLine>,
}

impl StockMovementPayload {
    pub fn new(action: MovementAction, material_id: i64, quantity: f64, warehouse_id: i64) -> Self {
        StockMovementPayload {
            kind: "stock-movement",
            action: action.as_str(),
            warehouse_id,
            stocks: vec![StockLine {
                material_id,
                quantity,
            }],
        }
    }
}

// =============================================================================
// Sales Order (ERP)
// =============================================================================

/// Inputs for one sales-order line: a consumed material and its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesLineInput {
    pub material_code: String,
    pub quantity: f64,
}

/// Run-time constants for sales-order creation (customer, salesperson and
/// exchange rate come from worker configuration, not from code).
#[derive(Debug, Clone, PartialEq)]
pub struct SalesOrderContext {
    pub customer_code: String,
    pub salesperson_guid: String,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRef {
    #[serde(rename = "CustomerCode")]
    pub customer_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalespersonRef {
    #[serde(rename = "Guid")]
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRef {
    #[serde(rename = "ProductCode")]
    pub product_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseRef {
    #[serde(rename = "WarehouseCode")]
    pub warehouse_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesOrderLine {
    #[serde(rename = "DiscountRate")]
    pub discount_rate: i64,
    #[serde(rename = "LineNumber")]
    pub line_number: usize,
    #[serde(rename = "LineTax")]
    pub line_tax: i64,
    #[serde(rename = "LineTotal")]
    pub line_total: i64,
    #[serde(rename = "OrderQuantity")]
    pub order_quantity: f64,
    #[serde(rename = "Product")]
    pub product: ProductRef,
    #[serde(rename = "UnitPrice")]
    pub unit_price: i64,
}

/// Create payload for `SalesOrders/{guid}`.
///
/// Monetary totals are zeroed: the ERP recosts the order on its side, the
/// sales order exists to consume stock against the originating warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesOrderPayload {
    #[serde(rename = "Customer")]
    pub customer: CustomerRef,
    #[serde(rename = "ExchangeRate")]
    pub exchange_rate: f64,
    #[serde(rename = "Guid")]
    pub guid: String,
    #[serde(rename = "OrderStatus")]
    pub order_status: &'static str,
    #[serde(rename = "SalesOrderLines")]
    pub sales_order_lines: Vec<SalesOrderLine>,
    #[serde(rename = "Salesperson")]
    pub salesperson: SalespersonRef,
    #[serde(rename = "SubTotal")]
    pub sub_total: f64,
    #[serde(rename = "TaxRate")]
    pub tax_rate: f64,
    #[serde(rename = "TaxTotal")]
    pub tax_total: f64,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Warehouse")]
    pub warehouse: WarehouseRef,
}

impl SalesOrderPayload {
    pub fn new(
        guid: Uuid,
        lines: &[SalesLineInput],
        warehouse_code: impl Into<String>,
        context: &SalesOrderContext,
    ) -> Self {
        SalesOrderPayload {
            customer: CustomerRef {
                customer_code: context.customer_code.clone(),
            },
            exchange_rate: context.exchange_rate,
            guid: guid.to_string(),
            order_status: "Completed",
            sales_order_lines: lines
                .iter()
                .enumerate()
                .map(|(index, line)| SalesOrderLine {
                    discount_rate: 0,
                    line_number: index + 1,
                    line_tax: 0,
                    line_total: 0,
                    order_quantity: line.quantity,
                    product: ProductRef {
                        product_code: line.material_code.clone(),
                    },
                    unit_price: 0,
                })
                .collect(),
            salesperson: SalespersonRef {
                guid: context.salesperson_guid.clone(),
            },
            sub_total: 0.0,
            tax_rate: 0.0,
            tax_total: 0.0,
            total: 0.0,
            warehouse: WarehouseRef {
                warehouse_code: warehouse_code.into(),
            },
        }
    }
}

// =============================================================================
// Golden Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            code: "15.HBF-08-08".into(),
            description: "Hose barb fitting 8mm".into(),
            average_cost: 2.37,
            unit_of_measure: Some("EA".into()),
            group: Some("FITTINGS".into()),
            warehouse_codes: vec![16, 18],
        }
    }

    #[test]
    fn test_folder_payload_shape() {
        let payload = FolderPayload::new("FITTINGS", &[16]);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "_type": "FOLDER",
                "name": "Folder",
                "code": "FITTINGS",
                "observation": "",
                "mean_price": 0.0,
                "units": "",
                "material_warehouse": [{
                    "warehouse_id": 16,
                    "min_stock": 1,
                    "mean_price": 0.0,
                    "observation": "string"
                }],
                "default_sell_price": 0,
                "default_sell_vat": 0
            })
        );
    }

    #[test]
    fn test_material_payload_shape() {
        let payload = MaterialPayload::new(&entry(), 4711, &[16, 18]);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "_type": "MATERIAL",
                "name": "Hose barb fitting 8mm",
                "code": "15.HBF-08-08",
                "observation": "",
                "mean_price": 2.37,
                "units": "un",
                "material_warehouse": [
                    {
                        "warehouse_id": 16,
                        "min_stock": 1,
                        "mean_price": 0.0,
                        "observation": "string"
                    },
                    {
                        "warehouse_id": 18,
                        "min_stock": 1,
                        "mean_price": 0.0,
                        "observation": "string"
                    }
                ],
                "parent_id": 4711,
                "default_sell_price": 0,
                "default_sell_vat": 0
            })
        );
    }

    #[test]
    fn test_stock_movement_payload_shape() {
        let add = StockMovementPayload::new(MovementAction::Add, 686272, 7.0, 16);
        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            json!({
                "_type": "stock-movement",
                "action": "ADD",
                "warehouse_id": 16,
                "stocks": [{ "material_id": 686272, "quantity": 7.0 }]
            })
        );

        let abate = StockMovementPayload::new(MovementAction::Abate, 686272, 7.0, 16);
        assert_eq!(
            serde_json::to_value(&abate).unwrap()["action"],
            json!("ABATE")
        );
    }

    #[test]
    fn test_sales_order_payload_shape() {
        let guid = Uuid::parse_str("5d71bd89-904d-41f3-837d-47787d277894").unwrap();
        let context = SalesOrderContext {
            customer_code: "ACME-FM".into(),
            salesperson_guid: "9f0f4b4e-0a3c-4f62-9f3d-1f2a6f6f0001".into(),
            exchange_rate: 0.10,
        };
        let lines = vec![SalesLineInput {
            material_code: "00.0130-8383".into(),
            quantity: 3.0,
        }];

        let payload = SalesOrderPayload::new(guid, &lines, "16", &context);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "Customer": { "CustomerCode": "ACME-FM" },
                "ExchangeRate": 0.10,
                "Guid": "5d71bd89-904d-41f3-837d-47787d277894",
                "OrderStatus": "Completed",
                "SalesOrderLines": [{
                    "DiscountRate": 0,
                    "LineNumber": 1,
                    "LineTax": 0,
                    "LineTotal": 0,
                    "OrderQuantity": 3.0,
                    "Product": { "ProductCode": "00.0130-8383" },
                    "UnitPrice": 0
                }],
                "Salesperson": { "Guid": "9f0f4b4e-0a3c-4f62-9f3d-1f2a6f6f0001" },
                "SubTotal": 0.0,
                "TaxRate": 0.0,
                "TaxTotal": 0.0,
                "Total": 0.0,
                "Warehouse": { "WarehouseCode": "16" }
            })
        );
    }

    #[test]
    fn test_payloads_are_reproducible() {
        let a = serde_json::to_string(&MaterialPayload::new(&entry(), 1, &[16])).unwrap();
        let b = serde_json::to_string(&MaterialPayload::new(&entry(), 1, &[16])).unwrap();
        assert_eq!(a, b);
    }
}
