use std::path::PathBuf;

use audiogist::domain::{Task, TaskId, TaskOutcome, TaskStage, TaskStatus};

fn queued_task() -> Task {
    Task::queued(
        TaskId::new(),
        PathBuf::from("/uploads/id_meeting.mp3"),
        "Focus on action items".to_string(),
    )
}

#[test]
fn given_new_task_when_queued_then_status_is_queued_without_outcome() {
    let task = queued_task();

    assert_eq!(task.status, TaskStatus::Queued);
    assert!(task.stage.is_none());
    assert!(task.outcome.is_none());
    assert!(!task.is_terminal());
    assert_eq!(task.created_at, task.updated_at);
}

#[test]
fn given_queued_task_when_started_then_processing_in_converting_stage() {
    let task = queued_task().start().unwrap();

    assert_eq!(task.status, TaskStatus::Processing);
    assert_eq!(task.stage, Some(TaskStage::Converting));
}

#[test]
fn given_processing_task_when_advanced_then_stage_changes_and_status_stays() {
    let task = queued_task()
        .start()
        .unwrap()
        .advance(TaskStage::Summarizing)
        .unwrap();

    assert_eq!(task.status, TaskStatus::Processing);
    assert_eq!(task.stage, Some(TaskStage::Summarizing));
}

#[test]
fn given_processing_task_when_completed_then_done_with_transcript_and_summary() {
    let original = queued_task();
    let done = original
        .start()
        .unwrap()
        .complete("hello there".to_string(), "greeting".to_string())
        .unwrap();

    assert_eq!(done.status, TaskStatus::Done);
    assert!(done.stage.is_none());
    assert!(done.is_terminal());
    assert_eq!(
        done.outcome,
        Some(TaskOutcome::Done {
            transcript: "hello there".to_string(),
            summary: "greeting".to_string(),
        })
    );
    assert_eq!(done.id, original.id);
    assert_eq!(done.created_at, original.created_at);
    assert!(done.updated_at >= original.updated_at);
}

#[test]
fn given_queued_task_when_completed_directly_then_transition_rejected() {
    let task = queued_task();

    let err = task
        .complete("t".to_string(), "s".to_string())
        .unwrap_err();

    assert_eq!(err.task_id, task.id);
    assert_eq!(err.from, TaskStatus::Queued);
    assert_eq!(err.to, TaskStatus::Done);
}

#[test]
fn given_queued_task_when_failed_then_error_with_message() {
    let failed = queued_task().fail("input vanished").unwrap();

    assert_eq!(failed.status, TaskStatus::Error);
    assert_eq!(
        failed.outcome,
        Some(TaskOutcome::Error {
            message: "input vanished".to_string()
        })
    );
}

#[test]
fn given_terminal_task_when_transitioning_again_then_every_transition_rejected() {
    let done = queued_task()
        .start()
        .unwrap()
        .complete("t".to_string(), "s".to_string())
        .unwrap();
    let failed = queued_task().fail("boom").unwrap();

    for terminal in [&done, &failed] {
        assert!(terminal.start().is_err());
        assert!(terminal.advance(TaskStage::Transcribing).is_err());
        assert!(terminal.fail("again").is_err());
        assert!(
            terminal
                .complete("t".to_string(), "s".to_string())
                .is_err()
        );
    }
}

#[test]
fn given_processing_task_when_started_twice_then_rejected() {
    let processing = queued_task().start().unwrap();

    assert!(processing.start().is_err());
}

#[test]
fn given_status_strings_when_parsing_then_roundtrip_lowercase() {
    for status in [
        TaskStatus::Queued,
        TaskStatus::Processing,
        TaskStatus::Done,
        TaskStatus::Error,
    ] {
        assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        assert_eq!(status.to_string(), status.as_str());
    }
    assert!("finished".parse::<TaskStatus>().is_err());
    assert_eq!(TaskStatus::Done.as_str(), "done");
}

#[test]
fn given_terminal_statuses_when_checked_then_only_done_and_error_are_terminal() {
    assert!(!TaskStatus::Queued.is_terminal());
    assert!(!TaskStatus::Processing.is_terminal());
    assert!(TaskStatus::Done.is_terminal());
    assert!(TaskStatus::Error.is_terminal());
}

#[test]
fn given_task_id_text_when_parsing_then_valid_uuid_accepted_and_garbage_rejected() {
    let id = TaskId::new();

    assert_eq!(TaskId::parse(&id.to_string()), Some(id));
    assert_eq!(TaskId::parse("not-a-uuid"), None);
}
