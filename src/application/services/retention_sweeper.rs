use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use super::artifacts::{remove_artifacts, task_artifacts};
use crate::application::ports::{TaskStore, TaskStoreError};

/// Evicts terminal task records older than a TTL and deletes what they left
/// on disk.
pub struct RetentionSweeper {
    task_store: Arc<dyn TaskStore>,
    output_dir: PathBuf,
    ttl: Duration,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(
        task_store: Arc<dyn TaskStore>,
        output_dir: PathBuf,
        ttl: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            task_store,
            output_dir,
            ttl,
            interval,
        }
    }

    /// One pass. Returns how many records were evicted.
    pub async fn sweep(&self) -> Result<usize, TaskStoreError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| TaskStoreError::Unavailable(format!("invalid ttl: {}", e)))?;
        // A TTL reaching past the representable range expires nothing.
        let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
            return Ok(0);
        };

        let expired = self.task_store.purge_terminal_before(cutoff).await?;
        for task in &expired {
            let artifacts = task_artifacts(&task.id, &task.input_path, &self.output_dir);
            remove_artifacts(&artifacts).await;
        }

        if !expired.is_empty() {
            tracing::info!(evicted = expired.len(), "Expired task records removed");
        }
        Ok(expired.len())
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep().await {
                    tracing::warn!(error = %e, "Retention sweep failed");
                }
            }
        })
    }
}
