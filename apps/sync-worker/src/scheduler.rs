//! Interval scheduling for the three polled jobs.
//!
//! One loop per job, each on its own tokio interval with
//! `MissedTickBehavior::Delay`. A job's next run never starts before the
//! previous one finished (the loop awaits the run), which is what makes the
//! store's read-then-write cycle safe without transactions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use kontroll_sync::jobs::{CatalogJob, PurchaseOrderJob, StockLevelsJob};

use crate::AppState;

/// Spawns the scheduled job loops; an interval of 0 disables a job.
pub fn spawn_schedules(state: &Arc<AppState>) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    handles.push(tokio::spawn(catalog_loop(state.clone())));
    handles.push(tokio::spawn(stock_loop(state.clone())));
    handles.push(tokio::spawn(orders_loop(state.clone())));

    handles
}

async fn catalog_loop(state: Arc<AppState>) {
    let Some(mut interval) = job_interval("catalog", state.config.catalog_interval_secs) else {
        return;
    };

    loop {
        interval.tick().await;

        let job = CatalogJob {
            erp: &state.erp,
            field_service: &state.field_service,
            default_warehouse: state.config.default_warehouse,
        };

        match job.run().await {
            Ok(outcome) => info!(
                unmatched = outcome.unmatched_count,
                created_material = ?outcome.created_material,
                "Catalog run complete"
            ),
            Err(err) => error!(error = %err, "Catalog run failed"),
        }
    }
}

async fn stock_loop(state: Arc<AppState>) {
    let Some(mut interval) = job_interval("stock_levels", state.config.stock_interval_secs) else {
        return;
    };

    loop {
        interval.tick().await;

        let job = StockLevelsJob {
            erp: &state.erp,
            field_service: &state.field_service,
        };

        match job.run().await {
            Ok(outcome) => info!(
                pairs = outcome.pairs,
                movements = outcome.movements.len(),
                "Stock levels run complete"
            ),
            Err(err) => error!(error = %err, "Stock levels run failed"),
        }
    }
}

async fn orders_loop(state: Arc<AppState>) {
    let Some(mut interval) = job_interval("purchase_orders", state.config.orders_interval_secs)
    else {
        return;
    };

    let store = state.db.purchase_orders();

    loop {
        interval.tick().await;

        let job = PurchaseOrderJob {
            erp: &state.erp,
            store: &store,
            notifier: state.notifier.as_ref(),
        };

        match job.run().await {
            Ok(outcome) => info!(?outcome, "Purchase orders run complete"),
            Err(err) => error!(error = %err, "Purchase orders run failed"),
        }
    }
}

/// Builds a job's interval, or `None` when the job is disabled.
fn job_interval(job: &str, secs: u64) -> Option<tokio::time::Interval> {
    if secs == 0 {
        info!(job, "Job disabled by configuration");
        return None;
    }

    info!(job, interval_secs = secs, "Job scheduled");
    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}
