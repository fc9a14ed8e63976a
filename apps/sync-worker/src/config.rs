//! Worker configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults; only the sales-order constants are required (they name real
//! business entities and must not be guessed).

use serde::{Deserialize, Serialize};
use std::env;

/// Sync worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// HTTP port for the webhook listener
    pub http_port: u16,

    /// ERP API base URL
    pub erp_base_url: String,

    /// Field-service API base URL
    pub field_service_base_url: String,

    /// `client-type` header value sent to the ERP
    pub erp_client_type: String,

    /// `User-Agent` header value sent to the field-service API
    pub field_service_user_agent: String,

    /// SQLite path for the purchase-order snapshot
    pub database_path: String,

    /// Redis connection string (optional; notifications log locally without it)
    pub redis_url: Option<String>,

    /// Redis channel notifications are published to
    pub notify_channel: String,

    /// Catalog job interval in seconds (0 disables the job)
    pub catalog_interval_secs: u64,

    /// Stock-levels job interval in seconds (0 disables the job)
    pub stock_interval_secs: u64,

    /// Purchase-orders job interval in seconds (0 disables the job)
    pub orders_interval_secs: u64,

    /// Warehouse used when a product matches no field-service warehouse
    pub default_warehouse: i64,

    /// Customer code sales orders are created under
    pub sales_customer_code: String,

    /// Salesperson GUID sales orders are attributed to
    pub sales_salesperson_guid: String,

    /// Exchange rate stamped on sales orders (the ERP requires a positive
    /// number)
    pub sales_exchange_rate: f64,

    /// Whether to verify webhook signatures (disabled by default)
    pub webhook_verify: bool,

    /// Shared secret for webhook signatures
    pub webhook_secret: Option<String>,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = WorkerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            erp_base_url: env::var("ERP_BASE_URL")
                .unwrap_or_else(|_| "https://api.unleashedsoftware.com".to_string()),

            field_service_base_url: env::var("FIELD_SERVICE_BASE_URL")
                .unwrap_or_else(|_| "https://api.sandbox.infraspeak.com/v3".to_string()),

            erp_client_type: env::var("ERP_CLIENT_TYPE")
                .unwrap_or_else(|_| "Kontroll/SyncWorker".to_string()),

            field_service_user_agent: env::var("FIELD_SERVICE_USER_AGENT")
                .unwrap_or_else(|_| "Kontroll SyncWorker (support@kontroll.example)".to_string()),

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/kontroll.db".to_string()),

            redis_url: env::var("REDIS_URL").ok(),

            notify_channel: env::var("NOTIFY_CHANNEL")
                .unwrap_or_else(|_| "purchase-order-updates".to_string()),

            catalog_interval_secs: env::var("CATALOG_INTERVAL_SECS")
                .unwrap_or_else(|_| "43200".to_string()) // 12 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CATALOG_INTERVAL_SECS".to_string()))?,

            stock_interval_secs: env::var("STOCK_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCK_INTERVAL_SECS".to_string()))?,

            orders_interval_secs: env::var("ORDERS_INTERVAL_SECS")
                .unwrap_or_else(|_| "900".to_string()) // 15 minutes
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDERS_INTERVAL_SECS".to_string()))?,

            default_warehouse: env::var("DEFAULT_WAREHOUSE")
                .unwrap_or_else(|_| "18".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_WAREHOUSE".to_string()))?,

            sales_customer_code: env::var("SALES_CUSTOMER_CODE")
                .map_err(|_| ConfigError::MissingRequired("SALES_CUSTOMER_CODE".to_string()))?,

            sales_salesperson_guid: env::var("SALES_SALESPERSON_GUID")
                .map_err(|_| ConfigError::MissingRequired("SALES_SALESPERSON_GUID".to_string()))?,

            sales_exchange_rate: env::var("SALES_EXCHANGE_RATE")
                .unwrap_or_else(|_| "0.10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALES_EXCHANGE_RATE".to_string()))?,

            webhook_verify: env::var("WEBHOOK_VERIFY")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
        };

        // Verification without a secret can never pass
        if config.webhook_verify && config.webhook_secret.is_none() {
            return Err(ConfigError::MissingRequired("WEBHOOK_SECRET".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
