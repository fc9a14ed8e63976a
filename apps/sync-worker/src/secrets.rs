//! API credential resolution.
//!
//! Credentials come from one accessor, resolved at startup: a JSON secrets
//! file when `SECRETS_FILE` is set (the shape the external secret store
//! serves), plain environment variables otherwise.

use serde::Deserialize;
use std::env;
use std::path::Path;

/// The three credentials the platform clients need.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    /// ERP API id (`api-auth-id` header).
    #[serde(rename = "API_ID")]
    pub api_id: String,

    /// ERP API key (HMAC signing key).
    #[serde(rename = "API_KEY")]
    pub api_key: String,

    /// Field-service bearer token.
    #[serde(rename = "API_KEY_INFRASPEAK")]
    pub field_service_token: String,
}

impl ApiCredentials {
    /// Resolves credentials from the secrets file or the environment.
    pub fn load() -> Result<Self, SecretsError> {
        if let Ok(path) = env::var("SECRETS_FILE") {
            return Self::from_file(Path::new(&path));
        }

        Ok(ApiCredentials {
            api_id: env::var("API_ID").map_err(|_| SecretsError::Missing("API_ID"))?,
            api_key: env::var("API_KEY").map_err(|_| SecretsError::Missing("API_KEY"))?,
            field_service_token: env::var("API_KEY_INFRASPEAK")
                .map_err(|_| SecretsError::Missing("API_KEY_INFRASPEAK"))?,
        })
    }

    fn from_file(path: &Path) -> Result<Self, SecretsError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SecretsError::Unreadable(path.display().to_string(), e.to_string()))?;
        let credentials = serde_json::from_str(&raw)
            .map_err(|e| SecretsError::Malformed(path.display().to_string(), e.to_string()))?;
        Ok(credentials)
    }
}

/// Credential resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Missing credential: {0}")]
    Missing(&'static str),

    #[error("Cannot read secrets file {0}: {1}")]
    Unreadable(String, String),

    #[error("Malformed secrets file {0}: {1}")]
    Malformed(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_file_shape() {
        let credentials: ApiCredentials = serde_json::from_str(
            r#"{
                "API_ID": "erp-id",
                "API_KEY": "erp-key",
                "API_KEY_INFRASPEAK": "fs-token"
            }"#,
        )
        .unwrap();

        assert_eq!(credentials.api_id, "erp-id");
        assert_eq!(credentials.api_key, "erp-key");
        assert_eq!(credentials.field_service_token, "fs-token");
    }
}
