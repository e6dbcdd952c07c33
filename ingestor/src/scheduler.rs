use crate::fetch::SourceFetcher;
use crate::health::HealthState;
use crate::orchestrator::{BatchSpec, Orchestrator};
use crate::store::RecordStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Ingests the previous day's infection status every `interval` until shutdown.
/// A failed run is recorded and waits for the next tick like any other.
pub async fn scheduler_loop<F, S>(
    orchestrator: Arc<Orchestrator<F, S>>,
    health: HealthState,
    interval: Duration,
    shutdown: CancellationToken,
) where
    F: SourceFetcher,
    S: RecordStore,
{
    info!(interval = ?interval, "initialized infection status scheduler");
    let mut initial_loop = true;
    loop {
        if initial_loop {
            initial_loop = false;
        } else {
            tokio::select! {
                _ = sleep(interval) => {},
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, exiting scheduler loop");
                    break;
                }
            }
        }

        let batch = BatchSpec::previous_day(Utc::now().date_naive());
        health.record_attempt();
        match orchestrator.run_infection_status(&batch).await {
            Ok(report) => {
                info!(rows_written = report.rows_written, "scheduled ingestion succeeded");
                health.record_success();
            }
            Err(e) => {
                warn!(error = ?e, "scheduled ingestion failed");
                health.record_failure(&e);
            }
        }

        // If shutdown was requested during the run, stop after finishing it.
        if shutdown.is_cancelled() {
            info!("shutdown requested, scheduler loop exiting after current run");
            break;
        }
    }
}
