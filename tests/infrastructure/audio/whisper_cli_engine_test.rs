use std::ffi::OsString;
use std::path::Path;

use audiogist::application::ports::{TranscriptionEngine, TranscriptionError};
use audiogist::infrastructure::audio::{AUTO_LANGUAGE, WhisperCliEngine};

fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn given_language_when_building_args_then_language_flag_included() {
    let engine = WhisperCliEngine::new("whisper-cli", "models/ggml-base.bin", Some("de".into()));

    let args = engine.build_args(Path::new("a.wav"), Path::new("out/id_transcript"));

    assert_eq!(
        args,
        os_args(&[
            "-m",
            "models/ggml-base.bin",
            "-f",
            "a.wav",
            "-l",
            "de",
            "-otxt",
            "-of",
            "out/id_transcript",
        ])
    );
}

#[test]
fn given_no_language_when_building_args_then_language_flag_omitted() {
    let engine = WhisperCliEngine::new("whisper-cli", "model.bin", Some("  ".into()));

    let args = engine.build_args(Path::new("a.wav"), Path::new("base"));

    assert!(!args.contains(&OsString::from("-l")));
    assert_eq!(args.last(), Some(&OsString::from("base")));
}

#[test]
fn given_auto_language_when_building_args_then_passed_through() {
    let engine = WhisperCliEngine::new("whisper-cli", "model.bin", Some(AUTO_LANGUAGE.into()));

    let args = engine.build_args(Path::new("a.wav"), Path::new("base"));

    assert!(args.windows(2).any(|w| w[0] == "-l" && w[1] == "auto"));
}

#[tokio::test]
async fn given_missing_executable_when_transcribing_then_spawn_failed() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = WhisperCliEngine::new(dir.path().join("no-such-whisper"), "model.bin", None);

    let result = engine
        .transcribe(&dir.path().join("a.wav"), &dir.path().join("base"))
        .await;

    assert!(matches!(result, Err(TranscriptionError::SpawnFailed(_))));
}

#[cfg(unix)]
mod with_fake_tool {
    use super::*;
    use crate::helpers::write_script;

    const WRITES_TRANSCRIPT: &str = r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-of" ]; then shift; base="$1"; fi
  shift
done
printf 'hello from whisper' > "$base.txt""#;

    #[tokio::test]
    async fn given_tool_writes_transcript_when_transcribing_then_returns_txt_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(dir.path(), "whisper-cli", WRITES_TRANSCRIPT);
        let engine = WhisperCliEngine::new(script, "model.bin", Some("en".into()));
        let base = dir.path().join("task_transcript");

        let path = engine
            .transcribe(&dir.path().join("a.wav"), &base)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("task_transcript.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello from whisper");
    }

    #[tokio::test]
    async fn given_nonzero_exit_when_transcribing_then_process_failed() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(
            dir.path(),
            "whisper-cli",
            "echo 'error: failed to open model.bin' >&2\nexit 3",
        );
        let engine = WhisperCliEngine::new(script, "model.bin", None);

        let result = engine
            .transcribe(&dir.path().join("a.wav"), &dir.path().join("base"))
            .await;

        match result {
            Err(TranscriptionError::ProcessFailed { status, stderr }) => {
                assert!(status.contains('3'), "{status}");
                assert!(stderr.contains("failed to open model.bin"), "{stderr}");
            }
            other => panic!("expected ProcessFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn given_zero_exit_without_transcript_when_transcribing_then_missing_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(dir.path(), "whisper-cli", "exit 0");
        let engine = WhisperCliEngine::new(script, "model.bin", None);

        let result = engine
            .transcribe(&dir.path().join("a.wav"), &dir.path().join("base"))
            .await;

        assert!(matches!(result, Err(TranscriptionError::MissingOutput(_))));
    }
}
