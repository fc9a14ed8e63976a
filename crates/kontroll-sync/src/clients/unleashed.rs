//! # ERP Client (Unleashed)
//!
//! Client for the inventory/ERP platform. Every request is signed: the URL
//! query string (empty for these endpoints) is HMAC-SHA256'd with the API key
//! and sent base64-encoded in `api-auth-signature` alongside `api-auth-id`.
//!
//! Pagination style: list endpoints are addressed as `{Resource}/Page/{n}`
//! and report `Pagination.NumberOfPages`; there is another page while
//! `NumberOfPages > n`.

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use kontroll_core::dates::format_wire_timestamp;
use kontroll_core::payloads::SalesOrderPayload;
use kontroll_core::{CatalogEntry, PurchaseOrderRecord, WarehouseMapping};

use crate::clients::{build_http_client, check_status, signing};
use crate::error::SyncResult;
use crate::fetch::Page;

// =============================================================================
// Client
// =============================================================================

/// Handle for the ERP REST API.
#[derive(Debug, Clone)]
pub struct UnleashedClient {
    http: Client,
    base_url: Url,
    api_id: String,
    api_key: String,
    /// Integration identifier the platform expects in `client-type`.
    client_type: String,
}

impl UnleashedClient {
    /// Creates a client for the given base URL and credentials.
    pub fn new(
        base_url: &str,
        api_id: impl Into<String>,
        api_key: impl Into<String>,
        client_type: impl Into<String>,
    ) -> SyncResult<Self> {
        // Url::join treats a base without a trailing slash as a file; make
        // sure endpoints append rather than replace.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(UnleashedClient {
            http: build_http_client()?,
            base_url: Url::parse(&normalized)?,
            api_id: api_id.into(),
            api_key: api_key.into(),
            client_type: client_type.into(),
        })
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        // The query string is empty for every endpoint in use, so the
        // signature is always over "".
        let signature = signing::signature(url.query().unwrap_or(""), &self.api_key);

        self.http
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header("api-auth-id", &self.api_id)
            .header("api-auth-signature", signature)
            .header(header::CONTENT_TYPE, "application/json")
            .header("client-type", &self.client_type)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> SyncResult<T> {
        let url = self.base_url.join(endpoint)?;
        debug!(%url, "ERP GET");

        let response = self.request(reqwest::Method::GET, url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &impl Serialize,
    ) -> SyncResult<T> {
        let url = self.base_url.join(endpoint)?;
        debug!(%url, "ERP POST");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(payload)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// One page of the product catalog.
    pub async fn products_page(&self, page: u32) -> SyncResult<Page<CatalogEntry>> {
        let body: ProductsPage = self.get_json(&format!("Products/Page/{page}")).await?;

        let has_next = body.pagination.pages_remain_after(page);
        let items = body.items.into_iter().map(CatalogEntry::from).collect();

        Ok(Page { items, has_next })
    }

    // =========================================================================
    // Purchase Orders
    // =========================================================================

    /// One page of purchase orders, normalized into tracker records.
    pub async fn purchase_orders_page(&self, page: u32) -> SyncResult<Page<PurchaseOrderRecord>> {
        let body: PurchaseOrdersPage =
            self.get_json(&format!("PurchaseOrders/Page/{page}")).await?;

        let has_next = body.pagination.pages_remain_after(page);
        let items = body
            .items
            .into_iter()
            .map(|order| PurchaseOrderRecord {
                purchase_order_number: order.order_number,
                status: order.order_status,
                last_modified_on: format_wire_timestamp(&order.last_modified_on),
                last_modified_by: order.last_modified_by.unwrap_or_default(),
            })
            .collect();

        Ok(Page { items, has_next })
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// One page of company-wide stock on hand.
    pub async fn stock_on_hand_page(&self, page: u32) -> SyncResult<Page<StockOnHandItem>> {
        let body: StockOnHandPage = self.get_json(&format!("StockOnHand/Page/{page}")).await?;

        let has_next = body.pagination.pages_remain_after(page);
        Ok(Page {
            items: body.items,
            has_next,
        })
    }

    /// Per-warehouse quantities for a single product.
    pub async fn warehouse_quantities(
        &self,
        product_guid: &str,
    ) -> SyncResult<Vec<ProductWarehouseQuantity>> {
        let body: WarehouseQuantitiesPage = self
            .get_json(&format!("StockOnHand/{product_guid}/AllWarehouses"))
            .await?;
        Ok(body.items)
    }

    /// The warehouse reference list (GUID → code).
    pub async fn warehouses(&self) -> SyncResult<Vec<WarehouseMapping>> {
        let body: WarehousesPage = self.get_json("Warehouses").await?;

        Ok(body
            .items
            .into_iter()
            .map(|warehouse| WarehouseMapping {
                external_id: warehouse.guid,
                code: warehouse.warehouse_code,
            })
            .collect())
    }

    // =========================================================================
    // Sales Orders
    // =========================================================================

    /// Creates a sales order under its correlation GUID.
    pub async fn create_sales_order(
        &self,
        payload: &SalesOrderPayload,
    ) -> SyncResult<serde_json::Value> {
        self.post_json(&format!("SalesOrders/{}", payload.guid), payload)
            .await
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(rename = "NumberOfPages", default)]
    number_of_pages: u32,
}

impl Pagination {
    fn pages_remain_after(&self, page: u32) -> bool {
        self.number_of_pages > page
    }
}

#[derive(Debug, Deserialize)]
struct ProductsPage {
    #[serde(rename = "Items", default)]
    items: Vec<WireProduct>,
    #[serde(rename = "Pagination", default)]
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    #[serde(rename = "ProductCode")]
    product_code: String,
    #[serde(rename = "ProductDescription", default)]
    product_description: Option<String>,
    #[serde(rename = "AverageLandPrice", default)]
    average_land_price: Option<f64>,
    #[serde(rename = "UnitOfMeasure", default)]
    unit_of_measure: Option<UnitOfMeasureRef>,
    #[serde(rename = "ProductGroup", default)]
    product_group: Option<ProductGroupRef>,
    #[serde(rename = "InventoryDetails", default)]
    inventory_details: Vec<InventoryDetail>,
}

#[derive(Debug, Deserialize)]
struct UnitOfMeasureRef {
    #[serde(rename = "Name", default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductGroupRef {
    #[serde(rename = "GroupName", default)]
    group_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InventoryDetail {
    #[serde(rename = "Warehouse", default)]
    warehouse: Option<WarehouseCodeRef>,
}

#[derive(Debug, Deserialize)]
struct WarehouseCodeRef {
    #[serde(rename = "WarehouseCode", default)]
    warehouse_code: Option<String>,
}

impl From<WireProduct> for CatalogEntry {
    fn from(wire: WireProduct) -> Self {
        let warehouse_codes = wire
            .inventory_details
            .iter()
            .filter_map(|detail| detail.warehouse.as_ref())
            .filter_map(|warehouse| warehouse.warehouse_code.as_deref())
            .filter_map(|code| code.trim().parse::<i64>().ok())
            .collect();

        CatalogEntry {
            code: wire.product_code,
            description: wire.product_description.unwrap_or_default(),
            average_cost: wire.average_land_price.unwrap_or(0.0),
            unit_of_measure: wire.unit_of_measure.and_then(|uom| uom.name),
            group: wire.product_group.and_then(|group| group.group_name),
            warehouse_codes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PurchaseOrdersPage {
    #[serde(rename = "Items", default)]
    items: Vec<WirePurchaseOrder>,
    #[serde(rename = "Pagination", default)]
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct WirePurchaseOrder {
    #[serde(rename = "OrderNumber")]
    order_number: String,
    #[serde(rename = "OrderStatus")]
    order_status: String,
    #[serde(rename = "LastModifiedOn", default)]
    last_modified_on: String,
    #[serde(rename = "LastModifiedBy", default)]
    last_modified_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StockOnHandPage {
    #[serde(rename = "Items", default)]
    items: Vec<StockOnHandItem>,
    #[serde(rename = "Pagination", default)]
    pagination: Pagination,
}

/// Company-wide stock-on-hand row (one per product).
#[derive(Debug, Clone, Deserialize)]
pub struct StockOnHandItem {
    #[serde(rename = "ProductGuid")]
    pub product_guid: String,
    #[serde(rename = "ProductCode")]
    pub product_code: String,
    #[serde(rename = "AvgCost", default)]
    pub average_cost: f64,
}

#[derive(Debug, Deserialize)]
struct WarehouseQuantitiesPage {
    #[serde(rename = "Items", default)]
    items: Vec<ProductWarehouseQuantity>,
}

/// One warehouse's on-hand quantity for a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductWarehouseQuantity {
    #[serde(rename = "WarehouseId")]
    pub warehouse_guid: String,
    #[serde(rename = "AvailableQty", default)]
    pub available_quantity: f64,
}

#[derive(Debug, Deserialize)]
struct WarehousesPage {
    #[serde(rename = "Items", default)]
    items: Vec<WireWarehouse>,
}

#[derive(Debug, Deserialize)]
struct WireWarehouse {
    #[serde(rename = "Guid")]
    guid: String,
    #[serde(rename = "WarehouseCode")]
    warehouse_code: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_page_maps_to_catalog_entries() {
        let body: ProductsPage = serde_json::from_str(
            r#"{
                "Items": [{
                    "ProductCode": "15.HBF-08-08",
                    "ProductDescription": "Hose barb fitting",
                    "AverageLandPrice": 2.37,
                    "UnitOfMeasure": { "Name": "EA" },
                    "ProductGroup": { "GroupName": "FITTINGS" },
                    "InventoryDetails": [
                        { "Warehouse": { "WarehouseCode": "16" } },
                        { "Warehouse": { "WarehouseCode": "main" } },
                        { "Warehouse": null }
                    ]
                }],
                "Pagination": { "NumberOfPages": 3 }
            }"#,
        )
        .unwrap();

        let entry = CatalogEntry::from(body.items.into_iter().next().unwrap());
        assert_eq!(entry.code, "15.HBF-08-08");
        assert_eq!(entry.group.as_deref(), Some("FITTINGS"));
        assert_eq!(entry.unit_of_measure.as_deref(), Some("EA"));
        // Non-numeric and missing warehouse codes are dropped.
        assert_eq!(entry.warehouse_codes, vec![16]);
        assert!(body.pagination.pages_remain_after(1));
        assert!(!body.pagination.pages_remain_after(3));
    }

    #[test]
    fn test_missing_pagination_means_single_page() {
        let body: ProductsPage = serde_json::from_str(r#"{ "Items": [] }"#).unwrap();
        assert!(!body.pagination.pages_remain_after(1));
    }

    #[test]
    fn test_purchase_order_wire_parse() {
        let body: PurchaseOrdersPage = serde_json::from_str(
            r#"{
                "Items": [{
                    "OrderNumber": "PO-00042",
                    "OrderStatus": "Placed",
                    "LastModifiedOn": "/Date(1700000000000)/",
                    "LastModifiedBy": "buyer@example.com"
                }],
                "Pagination": { "NumberOfPages": 1 }
            }"#,
        )
        .unwrap();

        assert_eq!(body.items[0].order_number, "PO-00042");
        assert_eq!(
            format_wire_timestamp(&body.items[0].last_modified_on),
            "2023-11-14 22:13:20"
        );
    }
}
