//! Outbound notification publishers.
//!
//! Production publishes to a Redis channel; without a configured Redis the
//! worker degrades to logging the summary locally instead of dropping it.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use kontroll_sync::error::{SyncError, SyncResult};
use kontroll_sync::Notifier;

// =============================================================================
// Redis
// =============================================================================

/// Publishes notifications to a Redis pub/sub channel as JSON
/// `{ subject, message }` payloads.
pub struct RedisNotifier {
    client: redis::Client,
    channel: String,
}

impl RedisNotifier {
    /// Creates a notifier for the given Redis URL and channel.
    pub fn new(redis_url: &str, channel: impl Into<String>) -> SyncResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| SyncError::Notify(format!("Invalid Redis URL: {e}")))?;

        Ok(RedisNotifier {
            client,
            channel: channel.into(),
        })
    }
}

#[async_trait]
impl Notifier for RedisNotifier {
    async fn publish(&self, subject: &str, body: &str) -> SyncResult<()> {
        let payload = json!({
            "subject": subject,
            "message": body,
        })
        .to_string();

        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| SyncError::Notify(e.to_string()))?;

        let _: () = redis::AsyncCommands::publish(&mut connection, &self.channel, payload)
            .await
            .map_err(|e| SyncError::Notify(e.to_string()))?;

        debug!(channel = %self.channel, "Notification published");
        Ok(())
    }
}

// =============================================================================
// Log fallback
// =============================================================================

/// Fallback notifier that writes the summary to the worker's own log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, subject: &str, body: &str) -> SyncResult<()> {
        info!(subject, %body, "Notification (no Redis configured)");
        Ok(())
    }
}
