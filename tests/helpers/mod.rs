#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use audiogist::application::ports::{
    AudioConverter, ConversionError, LlmClient, LlmClientError, LlmTokenStream, TaskStore,
    TranscriptionEngine, TranscriptionError,
};
use audiogist::domain::{Task, TaskId, transcript_file_for};

pub const TEST_TRANSCRIPT: &str = "Speaker one: welcome to the weekly sync.";
pub const TEST_SUMMARY: &str = "A short weekly sync.";

/// Writes a placeholder waveform, or fails when the input name contains
/// `fail_marker`.
#[derive(Default)]
pub struct StubConverter {
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<PathBuf>>,
    pub fail_marker: Option<String>,
}

impl StubConverter {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AudioConverter for StubConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_path_buf());

        if let Some(marker) = &self.fail_marker {
            if input.to_string_lossy().contains(marker.as_str()) {
                return Err(ConversionError::ProcessFailed {
                    status: "exit status: 1".to_string(),
                    stderr: "Invalid data found when processing input".to_string(),
                });
            }
        }

        tokio::fs::write(output, b"RIFF").await.unwrap();
        Ok(())
    }
}

/// Writes `transcript` where a real whisper CLI would.
pub struct StubTranscriber {
    pub calls: AtomicUsize,
    pub transcript: String,
    pub fail: bool,
}

impl StubTranscriber {
    pub fn returning(transcript: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            transcript: transcript.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            transcript: String::new(),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for StubTranscriber {
    async fn transcribe(
        &self,
        _waveform: &Path,
        output_base: &Path,
    ) -> Result<PathBuf, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranscriptionError::ProcessFailed {
                status: "exit status: 2".to_string(),
                stderr: "failed to load model".to_string(),
            });
        }
        let path = transcript_file_for(output_base);
        tokio::fs::write(&path, &self.transcript).await.unwrap();
        Ok(path)
    }
}

/// Records every prompt; answers with a fixed reply or fragments.
pub struct StubLlmClient {
    pub prompts: Mutex<Vec<(String, String)>>,
    pub reply: String,
    pub fragments: Vec<Result<String, String>>,
    pub fail: bool,
}

impl StubLlmClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
            fragments: vec![Ok(reply.to_string())],
            fail: false,
        }
    }

    pub fn streaming(fragments: &[&str]) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: fragments.concat(),
            fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            fail: false,
        }
    }

    pub fn with_fragments(fragments: Vec<Result<String, String>>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: String::new(),
            fragments,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: String::new(),
            fragments: Vec::new(),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl LlmClient for StubLlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmClientError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        if self.fail {
            return Err(LlmClientError::ApiRequestFailed("HTTP 500: boom".to_string()));
        }
        Ok(self.reply.clone())
    }

    async fn complete_stream(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<LlmTokenStream, LlmClientError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        if self.fail {
            return Err(LlmClientError::ApiRequestFailed("HTTP 500: boom".to_string()));
        }
        let items: Vec<Result<String, LlmClientError>> = self
            .fragments
            .iter()
            .map(|f| f.clone().map_err(LlmClientError::InvalidResponse))
            .collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Polls until the task reaches a terminal state.
pub async fn wait_for_terminal(store: &Arc<dyn TaskStore>, id: TaskId) -> Task {
    for _ in 0..200 {
        if let Some(task) = store.get(id).await.unwrap() {
            if task.is_terminal() {
                return task;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {} never reached a terminal state", id);
}

/// Builds a `multipart/form-data` body; returns (content type, body).
pub fn multipart_body(file: Option<(&str, &[u8])>, prompt_addon: Option<&str>) -> (String, Vec<u8>) {
    let boundary = "audiogist-test-boundary";
    let mut body = Vec::new();

    if let Some(addon) = prompt_addon {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"prompt_addon\"\r\n\r\n");
        body.extend_from_slice(addon.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((filename, data)) = file {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Writes an executable shell script standing in for an external CLI.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path
}
