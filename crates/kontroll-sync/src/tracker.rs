//! # Purchase-Order Status Tracker
//!
//! The stateful half of the snapshot diff engine: loads the persisted
//! snapshot, classifies the fresh feed against it (pure, in kontroll-core),
//! applies the resulting store mutations one by one and reports every status
//! change.
//!
//! ## Run Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tracker Run                                      │
//! │                                                                         │
//! │  1. store.scan_all()                 ← previously observed snapshot    │
//! │  2. diff::plan(feed, snapshot)       ← pure classification             │
//! │  3. for each action: put()/delete()  ← independent mutations           │
//! │  4. outcome                                                             │
//! │       ├── empty plan   ──► NoChanges (caller skips notification)       │
//! │       └── applied plan ──► Changes(status changes, plan order)         │
//! │                                                                         │
//! │  Any store failure aborts the run: a partially applied diff must not   │
//! │  be notified on. The next run re-converges from whatever committed.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Idempotent: run twice against the same feed, the second run applies an
//! empty plan and returns `NoChanges`.

use tracing::{debug, info};

use kontroll_core::diff::{self, DiffAction};
use kontroll_core::{PurchaseOrderRecord, StatusChange};
use kontroll_store::PurchaseOrderStore;

use crate::error::SyncResult;

/// Result of a tracker run.
///
/// `NoChanges` is deliberately distinct from `Changes(vec![])`: the former is
/// the "ran, nothing to report" sentinel and the only empty outcome this
/// tracker produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerOutcome {
    /// The feed matched the snapshot exactly; nothing was mutated.
    NoChanges,

    /// At least one mutation was applied; changes are in plan order
    /// (vanished-order deletions first, then feed order).
    Changes(Vec<StatusChange>),
}

/// Diffs the feed against the persisted snapshot and applies the result.
pub async fn track<S: PurchaseOrderStore + ?Sized>(
    store: &S,
    incoming: &[PurchaseOrderRecord],
) -> SyncResult<TrackerOutcome> {
    let existing = store.scan_all().await?;
    let plan = diff::plan(incoming, &existing);

    if plan.is_empty() {
        debug!(
            tracked = existing.len(),
            feed = incoming.len(),
            "Snapshot already converged"
        );
        return Ok(TrackerOutcome::NoChanges);
    }

    info!(actions = plan.len(), "Applying snapshot diff");

    let mut changes = Vec::with_capacity(plan.len());
    for action in plan {
        match action {
            DiffAction::Delete {
                purchase_order_number,
                change,
            } => {
                store.delete(&purchase_order_number).await?;
                debug!(
                    purchase_order_number = %change.purchase_order_number,
                    new_status = %change.new_status,
                    "Purchase order removed from tracking"
                );
                changes.push(change);
            }
            DiffAction::Put { record, change } => {
                store.put(&record).await?;
                debug!(
                    purchase_order_number = %change.purchase_order_number,
                    old_status = ?change.old_status,
                    new_status = %change.new_status,
                    "Purchase order stored"
                );
                changes.push(change);
            }
        }
    }

    Ok(TrackerOutcome::Changes(changes))
}

// =============================================================================
// Unit Tests
// =============================================================================
