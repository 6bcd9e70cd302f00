use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{TaskStore, TaskStoreError};
use crate::domain::{Task, TaskId};

/// Process-lifetime task records. Writers swap whole records under the write
/// lock; readers clone under the read lock.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, task: Task) -> Result<(), TaskStoreError> {
        let mut tasks = self.tasks.write().await;
        if let Some(existing) = tasks.get(&task.id) {
            if existing.is_terminal() {
                return Err(TaskStoreError::TerminalState(task.id));
            }
        }
        tasks.insert(task.id, task);
        Ok(())
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, TaskStoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn purge_terminal_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Task>, TaskStoreError> {
        let mut tasks = self.tasks.write().await;
        let expired: Vec<TaskId> = tasks
            .values()
            .filter(|t| t.is_terminal() && t.updated_at < cutoff)
            .map(|t| t.id)
            .collect();

        Ok(expired
            .into_iter()
            .filter_map(|id| tasks.remove(&id))
            .collect())
    }

    async fn len(&self) -> Result<usize, TaskStoreError> {
        Ok(self.tasks.read().await.len())
    }
}
