use std::sync::Arc;

use futures::TryStreamExt;

use crate::application::ports::{LlmClient, LlmClientError};

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that summarizes transcriptions.";
pub const PROMPT_PREAMBLE: &str = "Here is a transcript:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// One request, whole response body.
    Complete,
    /// Server-sent fragments concatenated in arrival order.
    Stream,
}

/// Preamble, transcript and the caller's addendum, blank-line separated.
/// An empty addendum still leaves the trailing separator in place.
pub fn build_summary_prompt(transcript: &str, prompt_addon: &str) -> String {
    format!("{PROMPT_PREAMBLE}\n\n{transcript}\n\n{prompt_addon}")
}

pub struct Summarizer {
    llm_client: Arc<dyn LlmClient>,
    mode: SummaryMode,
}

impl Summarizer {
    pub fn new(llm_client: Arc<dyn LlmClient>, mode: SummaryMode) -> Self {
        Self { llm_client, mode }
    }

    pub fn mode(&self) -> SummaryMode {
        self.mode
    }

    pub async fn summarize(
        &self,
        transcript: &str,
        prompt_addon: &str,
    ) -> Result<String, LlmClientError> {
        let prompt = build_summary_prompt(transcript, prompt_addon);

        match self.mode {
            SummaryMode::Complete => self.llm_client.complete(SYSTEM_INSTRUCTION, &prompt).await,
            SummaryMode::Stream => {
                let stream = self
                    .llm_client
                    .complete_stream(SYSTEM_INSTRUCTION, &prompt)
                    .await?;
                let summary = stream
                    .try_fold(String::new(), |mut acc, fragment| async move {
                        acc.push_str(&fragment);
                        Ok(acc)
                    })
                    .await?;
                tracing::debug!(chars = summary.len(), "Streamed summary assembled");
                Ok(summary)
            }
        }
    }
}
