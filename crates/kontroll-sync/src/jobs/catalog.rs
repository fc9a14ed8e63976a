//! # Catalog Job
//!
//! Mirrors ERP products the field-service platform doesn't know yet into its
//! material catalog: one missing product per run, under its group folder.
//!
//! ## Run Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Run                                     │
//! │                                                                         │
//! │  ERP products ──┐                                                       │
//! │                 ├──► matcher ──► first unmatched entry                  │
//! │  FS materials ──┘                    │                                  │
//! │                                      ▼                                  │
//! │  entry warehouses ∩ FS warehouses (default when empty)                  │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │  create-or-get group folder ──► create material                         │
//! │  (failures here are logged, not fatal to the run)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use tracing::{info, warn};

use kontroll_core::codes::normalize;
use kontroll_core::matcher;
use kontroll_core::payloads::{FolderPayload, MaterialPayload};
use kontroll_core::{CatalogEntry, DEFAULT_FOLDER};

use crate::clients::infraspeak::InfraspeakClient;
use crate::clients::unleashed::UnleashedClient;
use crate::error::SyncResult;
use crate::fetch::fetch_all_pages;

/// Catalog job handle.
pub struct CatalogJob<'a> {
    pub erp: &'a UnleashedClient,
    pub field_service: &'a InfraspeakClient,

    /// Warehouse used when a product maps to no known field-service
    /// warehouse.
    pub default_warehouse: i64,
}

/// What a catalog run accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOutcome {
    /// Products present in the ERP but absent from the field-service catalog.
    pub unmatched_count: usize,

    /// Id of the material created this run, when creation succeeded.
    pub created_material: Option<i64>,
}

impl CatalogJob<'_> {
    /// Runs one catalog reconciliation pass.
    pub async fn run(&self) -> SyncResult<CatalogOutcome> {
        // Both catalogs fetched concurrently; each degrades to partial data
        // on page errors rather than failing the run.
        let erp = self.erp;
        let field_service = self.field_service;
        let (entries, target_codes) = tokio::join!(
            fetch_all_pages(move |page| erp.products_page(page)),
            fetch_all_pages(move |page| field_service.material_codes_page(page)),
        );

        let source_codes: Vec<String> =
            entries.iter().map(|entry| entry.code.clone()).collect();
        let unmatched = matcher::unmatched(&source_codes, &target_codes);
        info!(
            source = source_codes.len(),
            target = target_codes.len(),
            unmatched = unmatched.len(),
            "Matched catalogs"
        );

        let entry = matcher::first_unmatched_entry(&unmatched, &entries)?;

        let group = entry
            .group
            .clone()
            .unwrap_or_else(|| DEFAULT_FOLDER.to_string());

        let available: HashSet<i64> = self.field_service.warehouse_ids().await?.into_iter().collect();
        let warehouses = select_warehouses(&entry.warehouse_codes, &available, self.default_warehouse);
        info!(?warehouses, "Matching warehouse ids");

        // Folder/material creation is isolated: a failure is logged and the
        // run still reports its match results.
        let created_material = match self.create_entry(entry, &group, &warehouses).await {
            Ok(material_id) => Some(material_id),
            Err(err) => {
                warn!(?warehouses, error = %err, "Error processing warehouses");
                None
            }
        };

        Ok(CatalogOutcome {
            unmatched_count: unmatched.len(),
            created_material,
        })
    }

    /// Creates the entry's group folder (if missing) and the material itself.
    async fn create_entry(
        &self,
        entry: &CatalogEntry,
        group: &str,
        warehouses: &[i64],
    ) -> SyncResult<i64> {
        let folder_id = self.create_or_get_folder(group, warehouses).await?;
        info!(folder_id, code = %entry.code, "Creating material");

        let material_id = self
            .field_service
            .create_material(&MaterialPayload::new(entry, folder_id, warehouses))
            .await?;

        info!(material_id, "Material created");
        Ok(material_id)
    }

    /// Finds the folder whose code matches the group, creating it when absent.
    async fn create_or_get_folder(&self, group: &str, warehouses: &[i64]) -> SyncResult<i64> {
        let wanted = normalize(group);
        let field_service = self.field_service;
        let folders = fetch_all_pages(move |page| field_service.folders_page(page)).await;

        if let Some(folder) = folders
            .iter()
            .find(|folder| normalize(&folder.code) == wanted)
        {
            return Ok(folder.material_id);
        }

        info!(group, "Folder does not exist, creating");
        self.field_service
            .create_material(&FolderPayload::new(group, warehouses))
            .await
    }
}

/// Intersects the entry's warehouse codes with the warehouses the target
/// platform knows, de-duplicated, falling back to the default warehouse when
/// nothing matches.
fn select_warehouses(entry_codes: &[i64], available: &HashSet<i64>, default: i64) -> Vec<i64> {
    let mut seen = HashSet::new();
    let matched: Vec<i64> = entry_codes
        .iter()
        .copied()
        .filter(|code| available.contains(code))
        .filter(|code| seen.insert(*code))
        .collect();

    if matched.is_empty() {
        info!(default, "No matching warehouses found, defaulting");
        vec![default]
    } else {
        matched
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_warehouses_intersects_and_dedupes() {
        let available: HashSet<i64> = [15, 16, 18].into_iter().collect();
        assert_eq!(
            select_warehouses(&[16, 99, 16, 18], &available, 18),
            vec![16, 18]
        );
    }

    #[test]
    fn test_select_warehouses_defaults_when_nothing_matches() {
        let available: HashSet<i64> = [15, 16].into_iter().collect();
        assert_eq!(select_warehouses(&[99], &available, 18), vec![18]);
        assert_eq!(select_warehouses(&[], &available, 18), vec![18]);
    }
}
