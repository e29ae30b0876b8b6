//! Optional cron-driven ingest runs.
//!
//! The admin endpoint is the primary trigger; the scheduler exists for
//! unattended refreshes and is disabled unless explicitly enabled.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::runner::IngestRunner;

/// Build and start a scheduler that ingests every seeded brand on the
/// configured cron expression. Returns `None` when scheduling is disabled.
pub async fn maybe_start_scheduler(runner: Arc<IngestRunner>) -> Result<Option<JobScheduler>> {
    let config = runner.config();
    if !config.scheduler_enabled {
        return Ok(None);
    }

    let cron = config.ingest_cron.clone();
    let sched = JobScheduler::new().await.context("creating scheduler")?;
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let runner = runner.clone();
        Box::pin(async move {
            info!("scheduled ingest run starting");
            match runner.run_all().await {
                Ok(results) => {
                    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
                    info!(
                        brands = results.len(),
                        failed, "scheduled ingest run finished"
                    );
                }
                Err(err) => error!(error = %err, "scheduled ingest run failed"),
            }
        })
    })
    .with_context(|| format!("creating ingest job for cron {cron}"))?;
    sched.add(job).await.context("adding ingest job")?;
    sched.start().await.context("starting scheduler")?;
    info!(%cron, "ingest scheduler started");
    Ok(Some(sched))
}
