use std::fmt;
use std::path::{Path, PathBuf};

use super::TaskId;

const FALLBACK_FILENAME: &str = "upload";

/// Name of an uploaded file inside the upload directory: `{task_id}_{filename}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn for_upload(task_id: &TaskId, filename: &str) -> Self {
        Self(format!("{}_{}", task_id, sanitize_filename(filename)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keeps the last path component and only `[A-Za-z0-9._-]`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Normalized waveform next to the upload: same stem, `.wav` extension.
/// An upload that already is `name.wav` gets `name.16k.wav` so ffmpeg never
/// reads and writes the same file.
pub fn waveform_path_for(input: &Path) -> PathBuf {
    let candidate = input.with_extension("wav");
    if candidate == input {
        input.with_extension("16k.wav")
    } else {
        candidate
    }
}

/// Base passed to the transcriber; the tool appends `.txt` itself.
pub fn transcript_base_for(output_dir: &Path, task_id: &TaskId) -> PathBuf {
    output_dir.join(format!("{}_transcript", task_id))
}

/// The text file the transcriber writes for `base`.
pub fn transcript_file_for(base: &Path) -> PathBuf {
    let mut raw = base.as_os_str().to_owned();
    raw.push(".txt");
    PathBuf::from(raw)
}
