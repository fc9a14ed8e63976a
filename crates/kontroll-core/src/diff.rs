//! # Snapshot Diff Classification
//!
//! Compares a freshly fetched purchase-order feed against the previously
//! persisted snapshot and classifies every record into the store mutation and
//! status-change report it requires.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Per-Record Classification                           │
//! │                                                                         │
//! │  in snapshot, absent from feed      ──► Delete + report "Deleted"      │
//! │  in both, feed status terminal      ──► Delete + report old → Complete │
//! │  in both, status changed            ──► Put    + report old → new      │
//! │  in both, status unchanged          ──► (nothing)                      │
//! │  feed only, status non-terminal     ──► Put    + report null → new     │
//! │  feed only, status terminal         ──► (nothing)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Emission order: deletions for vanished records first (snapshot order), then
//! per-feed-record order. No other cross-record ordering is promised.
//!
//! This module is the pure half of the tracker; applying the actions against
//! the persisted store happens in the sync crate. Keeping classification free
//! of I/O is what makes the scenario tests below possible without a database.

use std::collections::HashMap;

use crate::types::{PurchaseOrderRecord, StatusChange};
use crate::{STATUS_DELETED, TERMINAL_STATUS};

// =============================================================================
// Diff Actions
// =============================================================================

/// One store mutation plus the status change it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffAction {
    /// Remove the record from the persisted snapshot.
    Delete {
        purchase_order_number: String,
        change: StatusChange,
    },

    /// Insert or overwrite the record in the persisted snapshot.
    Put {
        record: PurchaseOrderRecord,
        change: StatusChange,
    },
}

impl DiffAction {
    /// The status change this action reports.
    pub fn change(&self) -> &StatusChange {
        match self {
            DiffAction::Delete { change, .. } => change,
            DiffAction::Put { change, .. } => change,
        }
    }
}

// =============================================================================
// Plan
// =============================================================================

/// Classifies the feed against the snapshot.
///
/// Pure: the returned actions describe every store mutation the tracker must
/// perform; an empty plan means the run converged with nothing to report.
///
/// Idempotence: applying the plan to the snapshot and planning again with the
/// same feed yields an empty plan.
pub fn plan(
    incoming: &[PurchaseOrderRecord],
    existing: &[PurchaseOrderRecord],
) -> Vec<DiffAction> {
    let existing_by_number: HashMap<&str, &PurchaseOrderRecord> = existing
        .iter()
        .map(|record| (record.purchase_order_number.as_str(), record))
        .collect();

    let mut actions = Vec::new();

    // Vanished orders first: tracked records no longer present in the feed.
    let incoming_numbers: std::collections::HashSet<&str> = incoming
        .iter()
        .map(|record| record.purchase_order_number.as_str())
        .collect();

    for record in existing {
        if !incoming_numbers.contains(record.purchase_order_number.as_str()) {
            actions.push(DiffAction::Delete {
                purchase_order_number: record.purchase_order_number.clone(),
                change: StatusChange {
                    purchase_order_number: record.purchase_order_number.clone(),
                    old_status: Some(record.status.clone()),
                    new_status: STATUS_DELETED.to_string(),
                    last_modified_on: record.last_modified_on.clone(),
                    last_modified_by: record.last_modified_by.clone(),
                },
            });
        }
    }

    // Then every feed record, in feed order.
    for record in incoming {
        match existing_by_number.get(record.purchase_order_number.as_str()) {
            Some(tracked) => {
                if record.is_terminal() {
                    actions.push(DiffAction::Delete {
                        purchase_order_number: record.purchase_order_number.clone(),
                        change: StatusChange {
                            purchase_order_number: record.purchase_order_number.clone(),
                            old_status: Some(tracked.status.clone()),
                            new_status: TERMINAL_STATUS.to_string(),
                            last_modified_on: record.last_modified_on.clone(),
                            last_modified_by: record.last_modified_by.clone(),
                        },
                    });
                } else if tracked.status != record.status {
                    actions.push(DiffAction::Put {
                        record: record.clone(),
                        change: StatusChange {
                            purchase_order_number: record.purchase_order_number.clone(),
                            old_status: Some(tracked.status.clone()),
                            new_status: record.status.clone(),
                            last_modified_on: record.last_modified_on.clone(),
                            last_modified_by: record.last_modified_by.clone(),
                        },
                    });
                }
                // Unchanged: no mutation, no report.
            }
            None => {
                // Terminal orders are never added to tracking.
                if !record.is_terminal() {
                    actions.push(DiffAction::Put {
                        record: record.clone(),
                        change: StatusChange {
                            purchase_order_number: record.purchase_order_number.clone(),
                            old_status: None,
                            new_status: record.status.clone(),
                            last_modified_on: record.last_modified_on.clone(),
                            last_modified_by: record.last_modified_by.clone(),
                        },
                    });
                }
            }
        }
    }

    actions
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: &str, status: &str) -> PurchaseOrderRecord {
        PurchaseOrderRecord {
            purchase_order_number: number.into(),
            status: status.into(),
            last_modified_on: "2024-03-01 09:30:00".into(),
            last_modified_by: "buyer".into(),
        }
    }

    /// Applies a plan to an in-memory snapshot, mirroring what the tracker
    /// does against the real store.
    fn apply(actions: &[DiffAction], snapshot: &mut Vec<PurchaseOrderRecord>) {
        for action in actions {
            match action {
                DiffAction::Delete {
                    purchase_order_number,
                    ..
                } => snapshot.retain(|r| &r.purchase_order_number != purchase_order_number),
                DiffAction::Put { record, .. } => {
                    snapshot.retain(|r| r.purchase_order_number != record.purchase_order_number);
                    snapshot.push(record.clone());
                }
            }
        }
    }

    #[test]
    fn test_unchanged_record_is_noop() {
        let existing = vec![record("PO-1", "Open")];
        let incoming = vec![record("PO-1", "Open")];
        assert!(plan(&incoming, &existing).is_empty());
    }

    #[test]
    fn test_new_record_is_stored_and_reported() {
        let incoming = vec![record("PO-2", "Open")];
        let actions = plan(&incoming, &[]);
        assert_eq!(actions.len(), 1);

        match &actions[0] {
            DiffAction::Put { record, change } => {
                assert_eq!(record.purchase_order_number, "PO-2");
                assert_eq!(change.old_status, None);
                assert_eq!(change.new_status, "Open");
                assert_eq!(change.last_modified_by, "buyer");
            }
            other => panic!("expected Put, got {other:?}"),
        }
    }

    #[test]
    fn test_new_terminal_record_is_ignored() {
        let incoming = vec![record("PO-9", "Complete")];
        assert!(plan(&incoming, &[]).is_empty());
    }

    #[test]
    fn test_completed_record_is_deleted_and_reported() {
        let existing = vec![record("PO-3", "Open")];
        let incoming = vec![record("PO-3", "Complete")];

        let actions = plan(&incoming, &existing);
        assert_eq!(actions.len(), 1);

        match &actions[0] {
            DiffAction::Delete { change, .. } => {
                assert_eq!(change.old_status.as_deref(), Some("Open"));
                assert_eq!(change.new_status, "Complete");
            }
            other => panic!("expected Delete, got {other:?}"),
        }
    }

    #[test]
    fn test_vanished_record_is_deleted_and_reported() {
        let existing = vec![record("PO-4", "Open")];

        let actions = plan(&[], &existing);
        assert_eq!(actions.len(), 1);

        match &actions[0] {
            DiffAction::Delete { change, .. } => {
                assert_eq!(change.old_status.as_deref(), Some("Open"));
                assert_eq!(change.new_status, "Deleted");
            }
            other => panic!("expected Delete, got {other:?}"),
        }
    }

    #[test]
    fn test_status_change_is_upserted_and_reported() {
        let existing = vec![record("PO-5", "Parked")];
        let incoming = vec![record("PO-5", "Placed")];

        let actions = plan(&incoming, &existing);
        assert_eq!(actions.len(), 1);

        match &actions[0] {
            DiffAction::Put { record, change } => {
                assert_eq!(record.status, "Placed");
                assert_eq!(change.old_status.as_deref(), Some("Parked"));
                assert_eq!(change.new_status, "Placed");
            }
            other => panic!("expected Put, got {other:?}"),
        }
    }

    #[test]
    fn test_deletes_emitted_before_feed_records() {
        let existing = vec![record("PO-GONE", "Open")];
        let incoming = vec![record("PO-NEW", "Open")];

        let actions = plan(&incoming, &existing);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].change().new_status, "Deleted");
        assert_eq!(actions[1].change().purchase_order_number, "PO-NEW");
    }

    #[test]
    fn test_second_run_against_converged_snapshot_is_empty() {
        let incoming = vec![
            record("PO-1", "Open"),
            record("PO-2", "Placed"),
            record("PO-3", "Complete"),
        ];
        let mut snapshot = vec![record("PO-3", "Open"), record("PO-4", "Open")];

        let first = plan(&incoming, &snapshot);
        assert!(!first.is_empty());
        apply(&first, &mut snapshot);

        let second = plan(&incoming, &snapshot);
        assert!(second.is_empty(), "second run produced {second:?}");
    }

    #[test]
    fn test_snapshot_never_gains_terminal_record() {
        let incoming = vec![record("PO-1", "Complete"), record("PO-2", "Complete")];
        let mut snapshot = vec![record("PO-1", "Open")];

        apply(&plan(&incoming, &snapshot), &mut snapshot);
        assert!(snapshot.iter().all(|r| !r.is_terminal()));
        assert!(snapshot.is_empty());
    }
}
