use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::artifacts::{remove_artifacts, task_artifacts};
use super::summarizer::Summarizer;
use super::task_queue::{TaskQueueConsumer, WorkItem};
use crate::application::ports::{
    AudioConverter, ConversionError, LlmClientError, TaskStore, TaskStoreError,
    TranscriptionEngine, TranscriptionError,
};
use crate::domain::{
    Task, TaskStage, TaskStateError, transcript_base_for, waveform_path_for,
};
use crate::infrastructure::observability::sanitize_prompt;

/// Drives one task through conversion, transcription and summarization and
/// records the outcome. Shared by every worker of a pool.
pub struct TaskPipeline {
    task_store: Arc<dyn TaskStore>,
    converter: Arc<dyn AudioConverter>,
    transcriber: Arc<dyn TranscriptionEngine>,
    summarizer: Arc<Summarizer>,
    output_dir: PathBuf,
    cleanup_after_processing: bool,
}

impl TaskPipeline {
    pub fn new(
        task_store: Arc<dyn TaskStore>,
        converter: Arc<dyn AudioConverter>,
        transcriber: Arc<dyn TranscriptionEngine>,
        summarizer: Arc<Summarizer>,
        output_dir: PathBuf,
        cleanup_after_processing: bool,
    ) -> Self {
        Self {
            task_store,
            converter,
            transcriber,
            summarizer,
            output_dir,
            cleanup_after_processing,
        }
    }

    /// Never fails: whatever goes wrong ends up in the task's record.
    pub async fn handle(&self, item: WorkItem) {
        let outcome = AssertUnwindSafe(self.process(&item)).catch_unwind().await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(panic) => Some(format!("task panicked: {}", panic_message(panic.as_ref()))),
        };

        if let Some(message) = failure {
            tracing::error!(error = %message, "Task could not be processed");
            self.force_fail(&item, &message).await;
        }

        if self.cleanup_after_processing {
            let artifacts = task_artifacts(&item.task_id, &item.input_path, &self.output_dir);
            let removed = remove_artifacts(&artifacts).await;
            tracing::debug!(removed, "Task artifacts cleaned up");
        }
    }

    async fn process(&self, item: &WorkItem) -> Result<(), PipelineError> {
        let queued = self
            .task_store
            .get(item.task_id)
            .await?
            .ok_or(TaskStoreError::NotFound(item.task_id))?;

        let mut task = queued.start()?;
        self.task_store.put(task.clone()).await?;
        tracing::debug!(
            status = %task.status,
            prompt_addon = %sanitize_prompt(&item.prompt_addon),
            "Task status transition"
        );

        match self.run_stages(&mut task, item).await {
            Ok((transcript, summary)) => {
                let transcript_chars = transcript.len();
                let summary_chars = summary.len();
                self.task_store
                    .put(task.complete(transcript, summary)?)
                    .await?;
                tracing::info!(transcript_chars, summary_chars, "Task completed");
            }
            Err(e) => {
                tracing::warn!(error = %e, stage = ?task.stage, "Task failed");
                self.task_store.put(task.fail(e.to_string())?).await?;
            }
        }

        Ok(())
    }

    async fn run_stages(
        &self,
        task: &mut Task,
        item: &WorkItem,
    ) -> Result<(String, String), PipelineError> {
        let waveform = waveform_path_for(&item.input_path);
        tracing::debug!(waveform = %waveform.display(), "Starting audio conversion");
        self.converter
            .convert(&item.input_path, &waveform)
            .await
            .map_err(PipelineError::Conversion)?;

        self.enter_stage(task, TaskStage::Transcribing).await?;
        let output_base = transcript_base_for(&self.output_dir, &item.task_id);
        let transcript_path = self
            .transcriber
            .transcribe(&waveform, &output_base)
            .await
            .map_err(PipelineError::Transcription)?;

        let transcript = tokio::fs::read_to_string(&transcript_path)
            .await
            .map_err(|e| PipelineError::TranscriptRead {
                path: transcript_path.display().to_string(),
                source: e,
            })?;

        self.enter_stage(task, TaskStage::Summarizing).await?;
        let summary = self
            .summarizer
            .summarize(&transcript, &item.prompt_addon)
            .await
            .map_err(PipelineError::Summarization)?;

        Ok((transcript, summary))
    }

    async fn enter_stage(&self, task: &mut Task, stage: TaskStage) -> Result<(), PipelineError> {
        *task = task.advance(stage)?;
        self.task_store.put(task.clone()).await?;
        tracing::debug!(stage = %stage, "Task stage transition");
        Ok(())
    }

    /// Last resort when the normal bookkeeping itself broke down.
    async fn force_fail(&self, item: &WorkItem, message: &str) {
        let current = match self.task_store.get(item.task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => Task::queued(
                item.task_id,
                item.input_path.clone(),
                item.prompt_addon.clone(),
            ),
            Err(e) => {
                tracing::error!(error = %e, "Unable to read task while recording failure");
                return;
            }
        };

        if current.is_terminal() {
            return;
        }

        let result = match current.fail(message) {
            Ok(failed) => self.task_store.put(failed).await.map_err(PipelineError::from),
            Err(e) => Err(PipelineError::from(e)),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "Unable to record task failure");
        }
    }
}

/// One long-lived consumer of the task queue.
pub struct TaskWorker {
    worker_id: usize,
    consumer: TaskQueueConsumer,
    pipeline: Arc<TaskPipeline>,
}

impl TaskWorker {
    pub fn new(worker_id: usize, consumer: TaskQueueConsumer, pipeline: Arc<TaskPipeline>) -> Self {
        Self {
            worker_id,
            consumer,
            pipeline,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker = self.worker_id, "Task worker started");
        while let Some(item) = self.consumer.dequeue().await {
            let span = tracing::info_span!(
                "summary_task",
                task_id = %item.task_id,
                worker = self.worker_id,
                input = %item.input_path.display(),
            );
            self.pipeline.handle(item).instrument(span).await;
            self.consumer.task_done();
        }
        tracing::info!(worker = self.worker_id, "Task worker stopped: queue closed");
    }
}

/// Spawns `size` workers (at least one) sharing `consumer`. With a single
/// worker tasks finish in submission order; with more, only dequeue order is
/// guaranteed.
pub fn spawn_worker_pool(
    size: usize,
    consumer: TaskQueueConsumer,
    pipeline: Arc<TaskPipeline>,
) -> Vec<JoinHandle<()>> {
    (0..size.max(1))
        .map(|worker_id| {
            let worker = TaskWorker::new(worker_id, consumer.clone(), Arc::clone(&pipeline));
            tokio::spawn(worker.run())
        })
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("audio conversion failed: {0}")]
    Conversion(ConversionError),
    #[error("transcription failed: {0}")]
    Transcription(TranscriptionError),
    #[error("failed to read transcript {path}: {source}")]
    TranscriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("summarization failed: {0}")]
    Summarization(LlmClientError),
    #[error("task store: {0}")]
    Store(#[from] TaskStoreError),
    #[error("task state: {0}")]
    State(#[from] TaskStateError),
}
