use std::path::Path;

use async_trait::async_trait;

/// Turns an arbitrary audio upload into mono 16 kHz s16le PCM.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to launch converter: {0}")]
    SpawnFailed(String),
    #[error("converter exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },
    #[error("converter produced no output at {0}")]
    MissingOutput(String),
}
