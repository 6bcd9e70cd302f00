use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::{TaskId, TaskStage, TaskStatus};

/// Result payload of a task that reached a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done { transcript: String, summary: String },
    Error { message: String },
}

/// One transcription + summarization job.
///
/// Records are values: every transition returns a fresh `Task` which the
/// store swaps in whole, so a reader sees either the old or the new record.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub input_path: PathBuf,
    pub prompt_addon: String,
    pub status: TaskStatus,
    pub stage: Option<TaskStage>,
    pub outcome: Option<TaskOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid transition for task {task_id}: {from} -> {to}")]
pub struct TaskStateError {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl Task {
    pub fn queued(id: TaskId, input_path: PathBuf, prompt_addon: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            input_path,
            prompt_addon,
            status: TaskStatus::Queued,
            stage: None,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// `queued -> processing`, entering the first stage.
    pub fn start(&self) -> Result<Task, TaskStateError> {
        self.ensure(TaskStatus::Queued, TaskStatus::Processing)?;
        Ok(self.with(TaskStatus::Processing, Some(TaskStage::Converting), None))
    }

    /// Moves a processing task to another stage.
    pub fn advance(&self, stage: TaskStage) -> Result<Task, TaskStateError> {
        self.ensure(TaskStatus::Processing, TaskStatus::Processing)?;
        Ok(self.with(TaskStatus::Processing, Some(stage), None))
    }

    pub fn complete(&self, transcript: String, summary: String) -> Result<Task, TaskStateError> {
        self.ensure(TaskStatus::Processing, TaskStatus::Done)?;
        Ok(self.with(
            TaskStatus::Done,
            None,
            Some(TaskOutcome::Done {
                transcript,
                summary,
            }),
        ))
    }

    /// Any non-terminal task may fail, including one that never started.
    pub fn fail(&self, message: impl Into<String>) -> Result<Task, TaskStateError> {
        if self.is_terminal() {
            return Err(self.illegal(TaskStatus::Error));
        }
        Ok(self.with(
            TaskStatus::Error,
            None,
            Some(TaskOutcome::Error {
                message: message.into(),
            }),
        ))
    }

    fn ensure(&self, expected: TaskStatus, to: TaskStatus) -> Result<(), TaskStateError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(self.illegal(to))
        }
    }

    fn illegal(&self, to: TaskStatus) -> TaskStateError {
        TaskStateError {
            task_id: self.id,
            from: self.status,
            to,
        }
    }

    fn with(
        &self,
        status: TaskStatus,
        stage: Option<TaskStage>,
        outcome: Option<TaskOutcome>,
    ) -> Task {
        Task {
            status,
            stage,
            outcome,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}
