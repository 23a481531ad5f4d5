use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument, warn};

use super::validate_6_field_cron;
use crate::services::RetentionService;

pub struct SweepScheduler {
    retention_service: Arc<RetentionService>,
    scheduler: JobScheduler,
}

impl SweepScheduler {
    pub async fn new(retention_service: Arc<RetentionService>) -> Result<Self> {
        let scheduler = JobScheduler::new().await
            .map_err(|e| anyhow!("Failed to create JobScheduler: {}", e))?;

        Ok(Self {
            retention_service,
            scheduler,
        })
    }

    /// Register one sweep job per store that has a schedule. Returns the
    /// number of jobs added; the scheduler only starts when that is non-zero.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<usize> {
        info!("Starting sweep scheduler with 6-field cron format (sec min hour day month dow)");
        let mut scheduled_count = 0;

        for store in self.retention_service.stores() {
            let Some(schedule) = store.sweep_schedule.clone() else {
                info!("No sweep schedule configured for store {}", store.name);
                continue;
            };

            match self.schedule_sweep_job(store.name.clone(), schedule.clone()).await {
                Ok(()) => {
                    scheduled_count += 1;
                    info!("Scheduled sweep for store {}: {}", store.name, schedule);
                }
                Err(e) => {
                    error!("Failed to schedule sweep for store {}: {} (schedule: {})", store.name, e, schedule);
                }
            }
        }

        if scheduled_count > 0 {
            self.scheduler.start().await
                .map_err(|e| anyhow!("Failed to start scheduler: {}", e))?;
            info!("Sweep scheduler started with {} jobs", scheduled_count);
        } else {
            warn!("No sweep schedules configured - scheduler not started");
        }

        Ok(scheduled_count)
    }

    async fn schedule_sweep_job(&self, store_name: String, schedule: String) -> Result<()> {
        validate_6_field_cron(&schedule)
            .map_err(|e| anyhow!("Invalid 6-field cron schedule '{}': {}", schedule, e))?;

        let retention_service = self.retention_service.clone();

        let job = Job::new_async(schedule.as_str(), move |_uuid, _scheduler| {
            let retention_service = retention_service.clone();
            let store_name = store_name.clone();

            Box::pin(async move {
                info!("Executing scheduled sweep for store {}", store_name);
                match retention_service.sweep_store(&store_name).await {
                    Ok(report) => info!(
                        "Scheduled sweep for {} completed: {} scopes, {} evicted, {} failed",
                        store_name,
                        report.scopes_checked,
                        report.evicted.len(),
                        report.failures.len()
                    ),
                    Err(e) => error!("Scheduled sweep for {} failed: {}", store_name, e),
                }
            })
        })
        .map_err(|e| anyhow!("Failed to create sweep job for '{}': {}", schedule, e))?;

        self.scheduler.add(job).await
            .map_err(|e| anyhow!("Failed to add sweep job to scheduler: {}", e))?;

        Ok(())
    }
}
