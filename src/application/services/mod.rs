mod artifacts;
mod retention_sweeper;
mod summarizer;
mod task_queue;
mod task_service;
mod task_worker;

pub use artifacts::{remove_artifacts, task_artifacts};
pub use retention_sweeper::RetentionSweeper;
pub use summarizer::{
    PROMPT_PREAMBLE, SYSTEM_INSTRUCTION, Summarizer, SummaryMode, build_summary_prompt,
};
pub use task_queue::{QueueError, QueueSlot, TaskQueue, TaskQueueConsumer, WorkItem, task_queue};
pub use task_service::{SubmitError, TaskService};
pub use task_worker::{PipelineError, TaskPipeline, TaskWorker, spawn_worker_pool};
