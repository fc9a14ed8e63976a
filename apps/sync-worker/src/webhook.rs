//! Webhook listener for field-service events.
//!
//! A failure-closed event triggers the sales-orders job for that failure.
//! Signature verification is implemented but disabled by default
//! (`WEBHOOK_VERIFY`), matching the upstream platform's current rollout.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tracing::{error, info, warn};

use kontroll_sync::jobs::SalesOrderJob;

use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Builds the worker's HTTP surface.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/webhooks/field-service", post(field_service_event))
        .with_state(state)
}

/// Liveness/readiness probe.
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded" })),
        )
    }
}

/// The only event field the sales-orders job needs.
#[derive(Debug, Deserialize)]
struct FieldServiceEvent {
    failure_id: i64,
}

/// Handles a field-service webhook delivery.
async fn field_service_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if state.config.webhook_verify {
        let signature = headers
            .get("x-signature")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let secret = state.config.webhook_secret.as_deref().unwrap_or_default();

        if !verify_signature(secret, &body, signature) {
            warn!("Rejected webhook with invalid signature");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Invalid signature" })),
            );
        }
    }

    let event: FieldServiceEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "Malformed webhook payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Malformed payload" })),
            );
        }
    };

    info!(failure_id = event.failure_id, "Webhook received");

    let job = SalesOrderJob {
        erp: &state.erp,
        field_service: &state.field_service,
        context: &state.sales_context,
    };

    match job.run(event.failure_id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "message": "Success",
                "guid": outcome.guid.to_string(),
                "lines": outcome.lines,
            })),
        ),
        Err(err) => {
            error!(failure_id = event.failure_id, error = %err, "Error handling webhook event");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error handling webhook event" })),
            )
        }
    }
}

/// Checks an `x-signature` header (`sha256=<hex hmac>`) against the payload.
fn verify_signature(secret: &str, payload: &[u8], signature_header: &str) -> bool {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    let expected = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

    expected == signature_header
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_signature_round_trip() {
        let secret = "webhook-secret";
        let payload = br#"{"failure_id":686272}"#;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        let header = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        assert!(verify_signature(secret, payload, &header));
        assert!(!verify_signature(secret, payload, "sha256=deadbeef"));
        assert!(!verify_signature("other-secret", payload, &header));
    }

    #[test]
    fn test_event_parse() {
        let event: FieldServiceEvent =
            serde_json::from_str(r#"{ "failure_id": 686272, "event": "failure.closed" }"#).unwrap();
        assert_eq!(event.failure_id, 686272);
    }
}
