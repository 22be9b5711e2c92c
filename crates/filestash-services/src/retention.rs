use crate::file_service::FileService;
use filestash_core::{AppError, DeletedFile, RetentionConfig};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Scheduled retention sweep.
///
/// Runs once after `initial_delay`, then again `interval` after each run
/// finishes, so two sweeps never overlap. A failed or panicking run is logged
/// and the schedule carries on.
pub struct RetentionService {
    file_service: Arc<FileService>,
    config: RetentionConfig,
    running: Mutex<()>,
}

impl RetentionService {
    pub fn new(file_service: Arc<FileService>, config: RetentionConfig) -> Self {
        Self {
            file_service,
            config,
            running: Mutex::new(()),
        }
    }

    /// Start the background sweep task.
    /// Returns a JoinHandle; cancelling `shutdown` stops the task between runs.
    pub fn start(self: Arc<Self>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                retention_days = self.config.retention_days,
                initial_delay_secs = self.config.initial_delay.as_secs(),
                interval_secs = self.config.interval.as_secs(),
                "Retention sweep scheduled"
            );

            let mut delay = self.config.initial_delay;
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.cancelled() => {
                        tracing::info!("Retention sweep stopped");
                        return;
                    }
                }

                self.clone().run_isolated().await;
                delay = self.config.interval;
            }
        })
    }

    /// Run one sweep on its own task so a panic cannot take the schedule down with it.
    async fn run_isolated(self: Arc<Self>) {
        let task = tokio::spawn(async move { self.run_once().await });

        match task.await {
            Ok(Ok(deleted)) => {
                tracing::info!(deleted = deleted.len(), "Retention sweep completed successfully")
            }
            Ok(Err(e)) => tracing::error!(error = %e, "Retention sweep failed"),
            Err(e) => tracing::error!(error = %e, "Retention sweep task aborted"),
        }
    }

    /// Sweep files older than the configured retention.
    ///
    /// If a sweep is already in progress this returns immediately with no deletions.
    #[tracing::instrument(skip(self), fields(retention.days = self.config.retention_days))]
    pub async fn run_once(&self) -> Result<Vec<DeletedFile>, AppError> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!("Retention sweep already running, skipping");
            return Ok(Vec::new());
        };

        tracing::info!(
            "Cleaning up files older than {} days",
            self.config.retention_days
        );

        let deleted = self.file_service.sweep(self.config.retention_days).await?;

        tracing::info!("Deleted {} files during cleanup", deleted.len());
        Ok(deleted)
    }
}
