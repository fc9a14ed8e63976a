//! # Sync Jobs
//!
//! One module per job variant. Each job is a plain struct holding borrowed
//! handles (clients, store, notifier) - constructed by the worker per run,
//! over dependencies built once per process.
//!
//! | Job | Trigger | Direction |
//! |-----|---------|-----------|
//! | [`catalog::CatalogJob`] | schedule | ERP catalog → field-service materials |
//! | [`stock_levels::StockLevelsJob`] | schedule | ERP stock → field-service movements |
//! | [`purchase_orders::PurchaseOrderJob`] | schedule | ERP orders → snapshot + notification |
//! | [`sales_orders::SalesOrderJob`] | webhook | field-service failure → ERP sales order |

pub mod catalog;
pub mod purchase_orders;
pub mod sales_orders;
pub mod stock_levels;

pub use catalog::{CatalogJob, CatalogOutcome};
pub use purchase_orders::{PurchaseOrderJob, PurchaseOrderOutcome};
pub use sales_orders::{SalesOrderJob, SalesOrderOutcome};
pub use stock_levels::{StockLevelsJob, StockLevelsOutcome};
