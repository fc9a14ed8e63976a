//! # Sales Orders Job
//!
//! Webhook-triggered: when the field-service platform closes a failure (work
//! order) that consumed stock, the consumed materials are written back to the
//! ERP as a completed sales order, so both platforms agree on what left the
//! warehouse.

use tracing::info;
use uuid::Uuid;

use kontroll_core::payloads::{SalesLineInput, SalesOrderContext, SalesOrderPayload};

use crate::clients::infraspeak::InfraspeakClient;
use crate::clients::unleashed::UnleashedClient;
use crate::error::{SyncError, SyncResult};

/// Sales orders job handle.
pub struct SalesOrderJob<'a> {
    pub erp: &'a UnleashedClient,
    pub field_service: &'a InfraspeakClient,

    /// Customer/salesperson/exchange-rate constants from worker config.
    pub context: &'a SalesOrderContext,
}

/// What a sales-order run accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOrderOutcome {
    /// Correlation GUID the order was created under.
    pub guid: Uuid,

    /// Number of order lines (one per consumed material).
    pub lines: usize,
}

impl SalesOrderJob<'_> {
    /// Creates the sales order for one failure's consumed stock.
    pub async fn run(&self, failure_id: i64) -> SyncResult<SalesOrderOutcome> {
        let tasks = self.field_service.failure_stock_tasks(failure_id).await?;
        if tasks.is_empty() {
            return Err(SyncError::MissingData(format!(
                "failure {failure_id} has no stock tasks"
            )));
        }

        // Material ids become product codes line by line; the order is billed
        // against the warehouse the first task consumed from.
        let mut lines = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let material_code = self.field_service.material_code(task.material_id).await?;
            lines.push(SalesLineInput {
                material_code,
                quantity: task.quantity,
            });
        }

        let warehouse_code = tasks[0].warehouse_id.to_string();
        let guid = Uuid::new_v4();
        let payload = SalesOrderPayload::new(guid, &lines, warehouse_code, self.context);

        self.erp.create_sales_order(&payload).await?;
        info!(%guid, failure_id, lines = lines.len(), "Sales order created");

        Ok(SalesOrderOutcome {
            guid,
            lines: lines.len(),
        })
    }
}
