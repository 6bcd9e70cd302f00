use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;

use super::task_queue::{QueueError, TaskQueue, WorkItem};
use crate::application::ports::{TaskStore, TaskStoreError, UploadStore, UploadStoreError};
use crate::domain::{StoragePath, Task, TaskId};

/// Accepts uploads and answers polls. Never waits on processing.
pub struct TaskService {
    task_store: Arc<dyn TaskStore>,
    upload_store: Arc<dyn UploadStore>,
    queue: TaskQueue,
}

impl TaskService {
    pub fn new(
        task_store: Arc<dyn TaskStore>,
        upload_store: Arc<dyn UploadStore>,
        queue: TaskQueue,
    ) -> Self {
        Self {
            task_store,
            upload_store,
            queue,
        }
    }

    /// Persists the upload, records the task as queued and hands it to the
    /// workers. The record exists before this returns, so an immediate poll
    /// always finds it.
    pub async fn submit(
        &self,
        filename: &str,
        data: BoxStream<'_, Result<Bytes, io::Error>>,
        prompt_addon: String,
    ) -> Result<TaskId, SubmitError> {
        if filename.trim().is_empty() {
            return Err(SubmitError::MissingFile);
        }

        let slot = self.queue.reserve()?;

        let task_id = TaskId::new();
        let storage_path = StoragePath::for_upload(&task_id, filename);
        let (input_path, bytes) = self.upload_store.store(&storage_path, data).await?;
        tracing::debug!(path = %input_path.display(), bytes, "Upload stored");

        let task = Task::queued(task_id, input_path.clone(), prompt_addon.clone());
        if let Err(e) = self.task_store.put(task).await {
            if let Err(del_err) = self.upload_store.delete(&storage_path).await {
                tracing::warn!(error = %del_err, path = %storage_path, "Failed to delete orphaned upload");
            }
            return Err(e.into());
        }

        slot.send(WorkItem {
            task_id,
            input_path,
            prompt_addon,
        });

        tracing::info!(task_id = %task_id, filename = %filename, "Summary task enqueued");
        Ok(task_id)
    }

    pub async fn poll(&self, task_id: TaskId) -> Result<Option<Task>, TaskStoreError> {
        self.task_store.get(task_id).await
    }

    /// Tasks waiting in the queue or currently being processed.
    pub fn outstanding(&self) -> usize {
        self.queue.outstanding()
    }

    pub async fn tracked(&self) -> Result<usize, TaskStoreError> {
        self.task_store.len().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no file uploaded")]
    MissingFile,
    #[error("queue: {0}")]
    Queue(#[from] QueueError),
    #[error("upload store: {0}")]
    Upload(#[from] UploadStoreError),
    #[error("task store: {0}")]
    Store(#[from] TaskStoreError),
}
