//! # Status Change Notifications
//!
//! Formats tracker output into the human-readable summary that goes out on
//! the notification channel, and defines the channel seam itself.

use async_trait::async_trait;

use kontroll_core::{StatusChange, STATUS_DELETED};

use crate::error::SyncResult;

/// Fixed subject line for purchase-order summaries.
pub const STATUS_SUBJECT: &str = "Your Purchase Order Update";

/// Outbound notification channel.
///
/// The worker provides the production implementation (Redis pub/sub); tests
/// capture messages in memory.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publishes one plain-text message under a subject line.
    async fn publish(&self, subject: &str, body: &str) -> SyncResult<()>;
}

/// Renders status changes into the multi-line summary body.
///
/// One line per change, prefixed by a fixed header; wording depends on
/// whether the order was created, deleted or transitioned.
pub fn format_status_message(changes: &[StatusChange]) -> String {
    if changes.is_empty() {
        return "No purchase orders were updated.".to_string();
    }

    let mut message = String::from("The following purchase order(s) have had changes:\n\n");

    for change in changes {
        let StatusChange {
            purchase_order_number,
            old_status,
            new_status,
            last_modified_on,
            last_modified_by,
        } = change;

        let line = match old_status {
            None => format!(
                "- Purchase order number {purchase_order_number} has been created with a status of {new_status}. Last modified on: {last_modified_on} by {last_modified_by}.\n"
            ),
            Some(old) if new_status == STATUS_DELETED => format!(
                "- Purchase order number {purchase_order_number} has been deleted (previous status: {old}). Last modified on: {last_modified_on} by {last_modified_by}.\n"
            ),
            Some(old) => format!(
                "- Purchase order number {purchase_order_number} has changed status from {old} to {new_status}. Last modified on: {last_modified_on} by {last_modified_by}.\n"
            ),
        };
        message.push_str(&line);
    }

    message
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn change(number: &str, old: Option<&str>, new: &str) -> StatusChange {
        StatusChange {
            purchase_order_number: number.into(),
            old_status: old.map(String::from),
            new_status: new.into(),
            last_modified_on: "2024-03-01 09:30:00".into(),
            last_modified_by: "buyer".into(),
        }
    }

    #[test]
    fn test_empty_changes() {
        assert_eq!(
            format_status_message(&[]),
            "No purchase orders were updated."
        );
    }

    #[test]
    fn test_created_wording() {
        let message = format_status_message(&[change("PO-1", None, "Open")]);
        assert_eq!(
            message,
            "The following purchase order(s) have had changes:\n\n\
             - Purchase order number PO-1 has been created with a status of Open. \
             Last modified on: 2024-03-01 09:30:00 by buyer.\n"
        );
    }

    #[test]
    fn test_deleted_wording() {
        let message = format_status_message(&[change("PO-2", Some("Open"), "Deleted")]);
        assert!(message.contains(
            "- Purchase order number PO-2 has been deleted (previous status: Open)."
        ));
    }

    #[test]
    fn test_transition_wording() {
        let message = format_status_message(&[change("PO-3", Some("Open"), "Costed")]);
        assert!(message.contains("- Purchase order number PO-3 has changed status from Open to Costed."));
    }

    #[test]
    fn test_one_line_per_change() {
        let message = format_status_message(&[
            change("PO-1", None, "Open"),
            change("PO-2", Some("Open"), "Placed"),
        ]);
        assert_eq!(message.lines().count(), 4); // header + blank + 2 changes
    }
}
