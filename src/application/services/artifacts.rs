use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{TaskId, transcript_base_for, transcript_file_for, waveform_path_for};

/// Every file a task leaves on disk: upload, waveform, transcript.
pub fn task_artifacts(task_id: &TaskId, input_path: &Path, output_dir: &Path) -> Vec<PathBuf> {
    vec![
        input_path.to_path_buf(),
        waveform_path_for(input_path),
        transcript_file_for(&transcript_base_for(output_dir, task_id)),
    ]
}

/// Best-effort removal; files that are already gone are fine.
pub async fn remove_artifacts(paths: &[PathBuf]) -> usize {
    let mut removed = 0;
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to delete task artifact");
            }
        }
    }
    removed
}
