use chrono::{DateTime, Utc};

use crate::domain::{Task, TaskId};

#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts or replaces the record for `task.id`. Replacing a terminal
    /// record is refused.
    async fn put(&self, task: Task) -> Result<(), TaskStoreError>;

    async fn get(&self, id: TaskId) -> Result<Option<Task>, TaskStoreError>;

    /// Removes terminal records last updated before `cutoff` and returns them.
    async fn purge_terminal_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Task>, TaskStoreError>;

    async fn len(&self) -> Result<usize, TaskStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TaskStoreError {
    #[error("task {0} already reached a terminal state")]
    TerminalState(TaskId),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
