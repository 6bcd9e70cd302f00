mod storage_path;
mod task;
mod task_id;
mod task_status;

pub use storage_path::{
    StoragePath, sanitize_filename, transcript_base_for, transcript_file_for, waveform_path_for,
};
pub use task::{Task, TaskOutcome, TaskStateError};
pub use task_id::TaskId;
pub use task_status::{TaskStage, TaskStatus};
