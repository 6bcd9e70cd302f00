use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::process::{ToolFailure, output_exists, run_tool};
use crate::application::ports::{AudioConverter, ConversionError};

pub const TARGET_SAMPLE_RATE: u32 = 16_000;
pub const TARGET_CHANNELS: u8 = 1;
pub const TARGET_CODEC: &str = "pcm_s16le";

/// Converts uploads to mono 16 kHz signed 16-bit little-endian WAV with the
/// ffmpeg CLI.
pub struct FfmpegConverter {
    executable: PathBuf,
}

impl FfmpegConverter {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn build_args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            "-ar".into(),
            TARGET_SAMPLE_RATE.to_string().into(),
            "-ac".into(),
            TARGET_CHANNELS.to_string().into(),
            "-c:a".into(),
            TARGET_CODEC.into(),
            output.into(),
        ]
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let mut command = Command::new(&self.executable);
        command.args(Self::build_args(input, output));

        tracing::debug!(
            executable = %self.executable.display(),
            input = %input.display(),
            "Running audio conversion"
        );

        run_tool(command).await.map_err(|failure| match failure {
            ToolFailure::Spawn(e) => {
                ConversionError::SpawnFailed(format!("{}: {}", self.executable.display(), e))
            }
            ToolFailure::Exit { status, stderr } => {
                ConversionError::ProcessFailed { status, stderr }
            }
        })?;

        if !output_exists(output).await {
            return Err(ConversionError::MissingOutput(output.display().to_string()));
        }

        Ok(())
    }
}
