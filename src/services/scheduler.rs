use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::services::sync::{ShowSynchronizer, SyncError};

const JOB_NAME: &str = "sync_shows";

pub struct Scheduler {
    synchronizer: Arc<ShowSynchronizer>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(synchronizer: Arc<ShowSynchronizer>, config: SchedulerConfig) -> Self {
        Self {
            synchronizer,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let synchronizer = Arc::clone(&self.synchronizer);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let synchronizer = Arc::clone(&synchronizer);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_job(&synchronizer).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.interval_minutes.max(1);
        info!("Scheduler running: sync every {}m", interval_mins);

        let mut sync_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));
        // The first tick fires immediately; startup runs are governed by `job.run_on_startup`.
        sync_interval.tick().await;

        loop {
            sync_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_job(&self.synchronizer).await;
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

async fn run_job(synchronizer: &ShowSynchronizer) {
    let start = std::time::Instant::now();
    info!(event = "job_started", job_name = JOB_NAME, "Starting scheduled show sync");

    match synchronizer.synchronize().await {
        Ok(report) => info!(
            event = "job_finished",
            job_name = JOB_NAME,
            inserted = report.inserted,
            skipped = report.skipped,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Scheduled show sync finished"
        ),
        Err(SyncError::AlreadyRunning) => warn!(
            event = "job_skipped",
            job_name = JOB_NAME,
            "Previous sync still running, skipping this trigger"
        ),
        Err(e) => error!(
            event = "job_failed",
            job_name = JOB_NAME,
            error = %e,
            "Scheduled show sync failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::tvmaze::ShowRecord;
    use crate::db::Store;
    use crate::services::sync::CatalogSource;

    struct EmptySource;

    #[async_trait::async_trait]
    impl CatalogSource for EmptySource {
        async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, SyncError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn disabled_scheduler_returns_immediately() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let synchronizer = Arc::new(ShowSynchronizer::new(Arc::new(EmptySource), Arc::new(store)));

        let scheduler = Scheduler::new(synchronizer, SchedulerConfig::default());
        scheduler.start().await.unwrap();
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test]
    async fn stop_clears_running_flag() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let synchronizer = Arc::new(ShowSynchronizer::new(Arc::new(EmptySource), Arc::new(store)));

        let scheduler = Arc::new(Scheduler::new(
            synchronizer,
            SchedulerConfig {
                enabled: true,
                cron_expression: None,
                interval_minutes: 1,
            },
        ));

        let handle = tokio::spawn({
            let scheduler = scheduler.clone();
            async move { scheduler.start().await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(scheduler.is_running().await);
        scheduler.stop().await;
        handle.abort();
        assert!(!scheduler.is_running().await);
    }
}
