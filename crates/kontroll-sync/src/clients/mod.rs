//! # Platform Clients
//!
//! REST clients for the two platforms being reconciled:
//!
//! - [`unleashed::UnleashedClient`] - the inventory/ERP platform. Signed
//!   requests (`api-auth-id` + HMAC `api-auth-signature`), page-count
//!   pagination (`Pagination.NumberOfPages`).
//! - [`infraspeak::InfraspeakClient`] - the field-service platform. Bearer
//!   token, JSON:API-style envelopes, `links.next` pagination.
//!
//! Both clients are cheap handles around a shared `reqwest::Client`,
//! constructed once per process and passed into jobs explicitly.

pub mod infraspeak;
pub mod signing;
pub mod unleashed;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Deserializer};

use crate::error::{SyncError, SyncResult};

/// Read timeout for platform requests.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for platform requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the shared HTTP client with sane timeouts.
pub(crate) fn build_http_client() -> SyncResult<Client> {
    let client = Client::builder()
        .timeout(READ_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Maps a non-2xx response to [`SyncError::Api`], capturing the body for the
/// logs.
pub(crate) async fn check_status(response: Response) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Api {
        status: status.as_u16(),
        body,
    })
}

// =============================================================================
// Lenient wire numbers
// =============================================================================
// The field-service API serializes ids and quantities inconsistently -
// sometimes JSON numbers, sometimes numeric strings. These adapters accept
// either.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)? as i64)
}

pub(crate) fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value as i64)),
        Some(NumberOrString::Text(raw)) => Ok(raw.trim().parse().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "lenient_f64")]
        quantity: f64,
        #[serde(deserialize_with = "lenient_i64")]
        id: i64,
        #[serde(default, deserialize_with = "lenient_opt_i64")]
        parent_id: Option<i64>,
    }

    #[test]
    fn test_lenient_numbers_accept_both_forms() {
        let from_numbers: Probe =
            serde_json::from_str(r#"{"quantity": 2.5, "id": 686272, "parent_id": 7}"#).unwrap();
        assert_eq!(from_numbers.quantity, 2.5);
        assert_eq!(from_numbers.id, 686272);
        assert_eq!(from_numbers.parent_id, Some(7));

        let from_strings: Probe =
            serde_json::from_str(r#"{"quantity": "2.5", "id": "686272", "parent_id": null}"#)
                .unwrap();
        assert_eq!(from_strings.quantity, 2.5);
        assert_eq!(from_strings.id, 686272);
        assert_eq!(from_strings.parent_id, None);
    }
}
