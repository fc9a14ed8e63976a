//! # Purchase Orders Job
//!
//! Polls the ERP's purchase orders, diffs them against the persisted
//! snapshot, and publishes a human-readable summary of every transition.
//!
//! An empty feed short-circuits before the tracker runs - mass-reporting the
//! whole snapshot as deleted because the ERP returned nothing would be worse
//! than skipping a cycle.

use tracing::info;

use kontroll_store::PurchaseOrderStore;

use crate::clients::unleashed::UnleashedClient;
use crate::error::SyncResult;
use crate::fetch::fetch_all_pages;
use crate::notify::{format_status_message, Notifier, STATUS_SUBJECT};
use crate::tracker::{track, TrackerOutcome};

/// Purchase orders job handle.
pub struct PurchaseOrderJob<'a, S: ?Sized, N: ?Sized> {
    pub erp: &'a UnleashedClient,
    pub store: &'a S,
    pub notifier: &'a N,
}

/// What a purchase-orders run accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOrderOutcome {
    /// The ERP returned no orders; the snapshot was left untouched.
    NoOrders,

    /// The feed matched the snapshot; no notification sent.
    NoChanges,

    /// Changes were applied and the summary was published.
    Notified { changes: usize },
}

impl<S, N> PurchaseOrderJob<'_, S, N>
where
    S: PurchaseOrderStore + ?Sized,
    N: Notifier + ?Sized,
{
    /// Runs one purchase-order tracking pass.
    pub async fn run(&self) -> SyncResult<PurchaseOrderOutcome> {
        let erp = self.erp;
        let feed = fetch_all_pages(move |page| erp.purchase_orders_page(page)).await;

        if feed.is_empty() {
            info!("No purchase orders retrieved");
            return Ok(PurchaseOrderOutcome::NoOrders);
        }

        match track(self.store, &feed).await? {
            TrackerOutcome::NoChanges => {
                info!("No updates detected, no message sent");
                Ok(PurchaseOrderOutcome::NoChanges)
            }
            TrackerOutcome::Changes(changes) => {
                let body = format_status_message(&changes);
                self.notifier.publish(STATUS_SUBJECT, &body).await?;
                info!(changes = changes.len(), "Purchase order summary published");

                Ok(PurchaseOrderOutcome::Notified {
                    changes: changes.len(),
                })
            }
        }
    }
}
