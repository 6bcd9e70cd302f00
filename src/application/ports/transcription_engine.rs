use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// Transcribes `waveform` and returns the path of the written text file,
    /// derived from `output_base`.
    async fn transcribe(
        &self,
        waveform: &Path,
        output_base: &Path,
    ) -> Result<PathBuf, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("failed to launch transcriber: {0}")]
    SpawnFailed(String),
    #[error("transcriber exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },
    #[error("transcriber produced no output at {0}")]
    MissingOutput(String),
}
