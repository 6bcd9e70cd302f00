use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::process::{ToolFailure, output_exists, run_tool};
use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::transcript_file_for;

/// Language value asking whisper to detect the spoken language itself.
pub const AUTO_LANGUAGE: &str = "auto";

/// Runs a whisper.cpp style CLI that writes a plain-text transcript next to
/// the given output base.
pub struct WhisperCliEngine {
    executable: PathBuf,
    model_path: PathBuf,
    language: Option<String>,
}

impl WhisperCliEngine {
    pub fn new(
        executable: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
        language: Option<String>,
    ) -> Self {
        Self {
            executable: executable.into(),
            model_path: model_path.into(),
            language: language.filter(|l| !l.trim().is_empty()),
        }
    }

    pub fn build_args(&self, waveform: &Path, output_base: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-m".into(),
            self.model_path.clone().into(),
            "-f".into(),
            waveform.into(),
        ];
        if let Some(language) = &self.language {
            args.push("-l".into());
            args.push(language.into());
        }
        args.push("-otxt".into());
        args.push("-of".into());
        args.push(output_base.into());
        args
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperCliEngine {
    async fn transcribe(
        &self,
        waveform: &Path,
        output_base: &Path,
    ) -> Result<PathBuf, TranscriptionError> {
        let mut command = Command::new(&self.executable);
        command.args(self.build_args(waveform, output_base));

        tracing::debug!(
            executable = %self.executable.display(),
            model = %self.model_path.display(),
            language = self.language.as_deref().unwrap_or("default"),
            "Running transcription"
        );

        run_tool(command).await.map_err(|failure| match failure {
            ToolFailure::Spawn(e) => {
                TranscriptionError::SpawnFailed(format!("{}: {}", self.executable.display(), e))
            }
            ToolFailure::Exit { status, stderr } => {
                TranscriptionError::ProcessFailed { status, stderr }
            }
        })?;

        let transcript_path = transcript_file_for(output_base);
        if !output_exists(&transcript_path).await {
            return Err(TranscriptionError::MissingOutput(
                transcript_path.display().to_string(),
            ));
        }

        tracing::info!(path = %transcript_path.display(), "Transcription completed");
        Ok(transcript_path)
    }
}
