//! # Field-Service Client (Infraspeak)
//!
//! Client for the field-service/maintenance platform. Bearer-token auth plus
//! the `User-Agent` the platform uses to attribute integrations.
//!
//! Pagination style: JSON:API-ish envelopes `{ data: [...], links: { next } }`;
//! there is another page while `links.next` is present.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use kontroll_core::codes::normalize;
use kontroll_core::payloads::StockMovementPayload;

use crate::clients::{build_http_client, check_status, lenient_f64, lenient_i64, lenient_opt_i64};
use crate::error::{SyncError, SyncResult};
use crate::fetch::Page;
use crate::reconcile::StockTarget;

/// Page size used for every list endpoint.
const PAGE_LIMIT: u32 = 1000;

// =============================================================================
// Client
// =============================================================================

/// Handle for the field-service REST API.
#[derive(Debug, Clone)]
pub struct InfraspeakClient {
    http: Client,
    base_url: Url,
    token: String,
    user_agent: String,
}

impl InfraspeakClient {
    /// Creates a client for the given base URL and bearer token.
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> SyncResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(InfraspeakClient {
            http: build_http_client()?,
            base_url: Url::parse(&normalized)?,
            token: token.into(),
            user_agent: user_agent.into(),
        })
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, &self.user_agent)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> SyncResult<T> {
        let url = self.base_url.join(endpoint)?;
        debug!(%url, "Field-service GET");

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
        debug!(%url, "Field-service POST");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(payload)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    // =========================================================================
    // Materials
    // =========================================================================

    /// One page of material codes (folders and leaf materials alike).
    pub async fn material_codes_page(&self, page: u32) -> SyncResult<Page<String>> {
        let body: ListEnvelope<MaterialResource> = self
            .get_json(&format!("materials/all?limit={PAGE_LIMIT}&page={page}"))
            .await?;

        let items = body
            .data
            .iter()
            .filter_map(|material| material.attributes.code.clone())
            .collect();

        Ok(Page {
            items,
            has_next: body.links.next.is_some(),
        })
    }

    /// One page of raw material resources, for code → id lookups.
    pub async fn materials_page(&self, page: u32) -> SyncResult<Page<MaterialRef>> {
        let body: ListEnvelope<MaterialResource> = self
            .get_json(&format!("materials/all?limit={PAGE_LIMIT}&page={page}"))
            .await?;

        let items = body
            .data
            .into_iter()
            .map(|material| MaterialRef {
                id: material.id,
                code: material.attributes.code,
                parent_id: material.attributes.parent_id,
            })
            .collect();

        Ok(Page {
            items,
            has_next: body.links.next.is_some(),
        })
    }

    /// One page of catalog folders (full code + material id).
    pub async fn folders_page(&self, page: u32) -> SyncResult<Page<FolderRef>> {
        let body: ListEnvelope<MaterialResource> = self
            .get_json(&format!("materials?limit={PAGE_LIMIT}&page={page}"))
            .await?;

        let items = body
            .data
            .into_iter()
            .filter_map(|material| {
                let code = material.attributes.full_code?;
                let material_id = material.attributes.material_id?;
                Some(FolderRef { code, material_id })
            })
            .collect();

        Ok(Page {
            items,
            has_next: body.links.next.is_some(),
        })
    }

    /// Creates a folder or material; returns the created resource id.
    pub async fn create_material(&self, payload: &impl Serialize) -> SyncResult<i64> {
        let body: SingleEnvelope<CreatedResource> = self.post_json("materials", payload).await?;
        Ok(body.data.id)
    }

    /// The code of a single material.
    pub async fn material_code(&self, material_id: i64) -> SyncResult<String> {
        let body: SingleEnvelope<MaterialResource> =
            self.get_json(&format!("materials/{material_id}")).await?;

        body.data
            .attributes
            .code
            .ok_or_else(|| SyncError::MissingData(format!("material {material_id} has no code")))
    }

    // =========================================================================
    // Warehouses & Stock
    // =========================================================================

    /// The numeric warehouse ids known to the platform.
    pub async fn warehouse_ids(&self) -> SyncResult<Vec<i64>> {
        let body: ListEnvelope<WarehouseResource> = self.get_json("warehouses").await?;

        Ok(body
            .data
            .into_iter()
            .map(|warehouse| warehouse.attributes.warehouse_id)
            .collect())
    }

    /// One page of per-(material, warehouse) stock quantities.
    pub async fn material_quantities_page(&self, page: u32) -> SyncResult<Page<MaterialQuantity>> {
        let body: ListEnvelope<QuantityResource> = self
            .get_json(&format!(
                "warehouses/material-quantities?limit={PAGE_LIMIT}&page={page}"
            ))
            .await?;

        Ok(Page {
            items: body.data.into_iter().map(|q| q.attributes).collect(),
            has_next: body.links.next.is_some(),
        })
    }

    /// Posts a stock adjustment.
    pub async fn post_stock_movement(
        &self,
        payload: &StockMovementPayload,
    ) -> SyncResult<serde_json::Value> {
        self.post_json("stock-movements", payload).await
    }

    // =========================================================================
    // Failures
    // =========================================================================

    /// The stock consumed by a failure (work order), from its expanded stock
    /// tasks.
    pub async fn failure_stock_tasks(&self, failure_id: i64) -> SyncResult<Vec<StockTask>> {
        let body: FailureEnvelope = self
            .get_json(&format!(
                "failures/{failure_id}?expanded=stock.material,stockTasks.material"
            ))
            .await?;

        let tasks = body
            .included
            .into_iter()
            .filter_map(|resource| {
                // Only included resources carrying a quantity are stock rows.
                let quantity = resource.attributes.quantity?;
                Some(StockTask {
                    material_id: resource.id,
                    warehouse_id: resource.attributes.warehouse_id?,
                    quantity,
                })
            })
            .collect();

        Ok(tasks)
    }
}

// =============================================================================
// StockTarget seam
// =============================================================================

#[async_trait]
impl StockTarget for InfraspeakClient {
    /// Paginated scan for a leaf material (folders have no parent and are
    /// skipped) whose normalized code matches; early exit on first hit.
    async fn find_material_id(&self, code: &str) -> SyncResult<Option<i64>> {
        let wanted = normalize(code);
        let mut page = 1;

        loop {
            let current = self.materials_page(page).await?;

            for material in &current.items {
                let Some(material_code) = material.code.as_deref() else {
                    continue;
                };
                if material.parent_id.is_some() && normalize(material_code) == wanted {
                    debug!(material_id = material.id, code, "Found material with parent");
                    return Ok(Some(material.id));
                }
            }

            if !current.has_next {
                return Ok(None);
            }
            page += 1;
        }
    }

    /// Paginated scan for the (material, warehouse) quantity; early exit on
    /// first hit, 0 when the pair is absent.
    async fn quantity_on_hand(&self, material_id: i64, warehouse_id: i64) -> SyncResult<f64> {
        let mut page = 1;

        loop {
            let current = self.material_quantities_page(page).await?;

            for quantity in &current.items {
                if quantity.material_id == material_id && quantity.warehouse_id == warehouse_id {
                    return Ok(quantity.stock_quantity);
                }
            }

            if !current.has_next {
                return Ok(0.0);
            }
            page += 1;
        }
    }

    async fn apply_movement(&self, payload: &StockMovementPayload) -> SyncResult<()> {
        self.post_stock_movement(payload).await?;
        Ok(())
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListEnvelope<T> {
    #[serde(default)]
    data: Vec<T>,
    #[serde(default)]
    links: PageLinks,
}

#[derive(Debug, Deserialize)]
struct SingleEnvelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MaterialResource {
    #[serde(deserialize_with = "lenient_i64")]
    id: i64,
    #[serde(default)]
    attributes: MaterialAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct MaterialAttributes {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    full_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    material_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    parent_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    #[serde(deserialize_with = "lenient_i64")]
    id: i64,
}

#[derive(Debug, Deserialize)]
struct WarehouseResource {
    attributes: WarehouseAttributes,
}

#[derive(Debug, Deserialize)]
struct WarehouseAttributes {
    #[serde(deserialize_with = "lenient_i64")]
    warehouse_id: i64,
}

#[derive(Debug, Deserialize)]
struct QuantityResource {
    attributes: MaterialQuantity,
}

/// One (material, warehouse) stock quantity row.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialQuantity {
    #[serde(deserialize_with = "lenient_i64")]
    pub material_id: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub warehouse_id: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stock_quantity: f64,
}

#[derive(Debug, Deserialize)]
struct FailureEnvelope {
    #[serde(default)]
    included: Vec<IncludedResource>,
}

#[derive(Debug, Deserialize)]
struct IncludedResource {
    #[serde(deserialize_with = "lenient_i64")]
    id: i64,
    #[serde(default)]
    attributes: IncludedAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct IncludedAttributes {
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    warehouse_id: Option<i64>,
}

/// A material reference from the listing endpoints.
#[derive(Debug, Clone)]
pub struct MaterialRef {
    pub id: i64,
    pub code: Option<String>,
    pub parent_id: Option<i64>,
}

/// A catalog folder reference (full code + owning material id).
#[derive(Debug, Clone)]
pub struct FolderRef {
    pub code: String,
    pub material_id: i64,
}

/// Stock consumed by a failure, resolved per material.
#[derive(Debug, Clone, PartialEq)]
pub struct StockTask {
    pub material_id: i64,
    pub warehouse_id: i64,
    pub quantity: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_with_next_link() {
        let body: ListEnvelope<MaterialResource> = serde_json::from_str(
            r#"{
                "data": [
                    { "id": "686272", "attributes": { "code": " ab-1 ", "parent_id": "12" } },
                    { "id": 9, "attributes": { "full_code": "FITTINGS", "material_id": 9 } }
                ],
                "links": { "next": "https://example.test/materials/all?page=2" }
            }"#,
        )
        .unwrap();

        assert!(body.links.next.is_some());
        assert_eq!(body.data[0].id, 686272);
        assert_eq!(body.data[0].attributes.parent_id, Some(12));
        assert_eq!(body.data[1].attributes.full_code.as_deref(), Some("FITTINGS"));
    }

    #[test]
    fn test_list_envelope_without_links() {
        let body: ListEnvelope<MaterialResource> =
            serde_json::from_str(r#"{ "data": [] }"#).unwrap();
        assert!(body.links.next.is_none());
    }

    #[test]
    fn test_failure_envelope_filters_non_stock_rows() {
        let body: FailureEnvelope = serde_json::from_str(
            r#"{
                "included": [
                    { "id": 686272, "attributes": { "quantity": 3, "warehouse_id": 16 } },
                    { "id": 1, "attributes": { "name": "a material, no quantity" } }
                ]
            }"#,
        )
        .unwrap();

        let tasks: Vec<StockTask> = body
            .included
            .into_iter()
            .filter_map(|resource| {
                let quantity = resource.attributes.quantity?;
                Some(StockTask {
                    material_id: resource.id,
                    warehouse_id: resource.attributes.warehouse_id?,
                    quantity,
                })
            })
            .collect();

        assert_eq!(
            tasks,
            vec![StockTask {
                material_id: 686272,
                warehouse_id: 16,
                quantity: 3.0
            }]
        );
    }
}
