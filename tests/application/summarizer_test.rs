use std::sync::Arc;

use audiogist::application::ports::LlmClientError;
use audiogist::application::services::{
    PROMPT_PREAMBLE, SYSTEM_INSTRUCTION, Summarizer, SummaryMode, build_summary_prompt,
};

use crate::helpers::StubLlmClient;

#[test]
fn given_transcript_and_addon_when_building_prompt_then_sections_are_blank_line_separated() {
    let prompt = build_summary_prompt("the transcript", "Use bullet points.");

    assert_eq!(
        prompt,
        format!("{PROMPT_PREAMBLE}\n\nthe transcript\n\nUse bullet points.")
    );
}

#[test]
fn given_empty_addon_when_building_prompt_then_trailing_separator_remains() {
    let prompt = build_summary_prompt("the transcript", "");

    assert!(prompt.ends_with("the transcript\n\n"));
}

#[tokio::test]
async fn given_complete_mode_when_summarizing_then_returns_whole_reply() {
    let llm = Arc::new(StubLlmClient::replying("Short summary."));
    let summarizer = Summarizer::new(llm.clone(), SummaryMode::Complete);

    let summary = summarizer.summarize("words", "addon").await.unwrap();

    assert_eq!(summary, "Short summary.");
    let (system, prompt) = llm.last_prompt().unwrap();
    assert_eq!(system, SYSTEM_INSTRUCTION);
    assert_eq!(prompt, build_summary_prompt("words", "addon"));
}

#[tokio::test]
async fn given_stream_mode_when_fragments_arrive_then_concatenated_in_order() {
    let llm = Arc::new(StubLlmClient::streaming(&["Hello ", "world", "!"]));
    let summarizer = Summarizer::new(llm, SummaryMode::Stream);

    let summary = summarizer.summarize("words", "").await.unwrap();

    assert_eq!(summary, "Hello world!");
}

#[tokio::test]
async fn given_stream_mode_when_fragment_is_malformed_then_summarization_fails() {
    let llm = Arc::new(StubLlmClient::with_fragments(vec![
        Ok("Hello ".to_string()),
        Err("malformed stream fragment: {oops".to_string()),
        Ok("never".to_string()),
    ]));
    let summarizer = Summarizer::new(llm, SummaryMode::Stream);

    let result = summarizer.summarize("words", "").await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_failing_client_when_summarizing_then_error_propagates() {
    let summarizer = Summarizer::new(Arc::new(StubLlmClient::failing()), SummaryMode::Complete);

    let result = summarizer.summarize("words", "").await;

    assert!(matches!(result, Err(LlmClientError::ApiRequestFailed(_))));
    assert_eq!(summarizer.mode(), SummaryMode::Complete);
}
