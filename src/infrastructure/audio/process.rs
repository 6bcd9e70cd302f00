use std::io;
use std::process::Stdio;

use tokio::process::Command;

const STDERR_TAIL_LINES: usize = 12;

pub(super) enum ToolFailure {
    Spawn(io::Error),
    Exit { status: String, stderr: String },
}

/// Runs `command` to completion, capturing its output. Non-zero exit is a
/// failure carrying the tail of stderr.
pub(super) async fn run_tool(mut command: Command) -> Result<(), ToolFailure> {
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(ToolFailure::Spawn)?;

    if output.status.success() {
        return Ok(());
    }

    Err(ToolFailure::Exit {
        status: output.status.to_string(),
        stderr: stderr_tail(&output.stderr),
    })
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    let tail = lines[start..].join("\n");
    if tail.is_empty() {
        "no diagnostic output".to_string()
    } else {
        tail
    }
}

pub(super) async fn output_exists(path: &std::path::Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
