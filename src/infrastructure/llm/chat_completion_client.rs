use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::sse_decoder::SseDecoder;
use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};
use crate::presentation::config::LlmSettings;

const STREAM_DONE: &str = "[DONE]";

/// OpenAI-compatible chat completions client, whole-response or streamed.
pub struct ChatCompletionClient {
    client: Client,
    provider: String,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            provider: "openai".to_string(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system: &str, prompt: &str, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: stream.then_some(true),
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.provider == "azure" {
            request.header("api-key", &self.api_key)
        } else {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    async fn send(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, LlmClientError> {
        let request = self.client.post(&self.endpoint).json(body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmClient for ChatCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmClientError> {
        let request_body = self.build_request(system, prompt, false);
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting completion");

        let completion_response: ChatCompletionResponse = self
            .send(&request_body)
            .await?
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }

    async fn complete_stream(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<LlmTokenStream, LlmClientError> {
        let request_body = self.build_request(system, prompt, true);
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting streamed completion");

        let response = self.send(&request_body).await?;
        Ok(fragment_stream(response.bytes_stream().boxed()))
    }
}

struct FragmentState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, LlmClientError>>,
    finished: bool,
    saw_done: bool,
}

impl FragmentState {
    /// Queues the fragment carried by one `data:` payload. Returns false once
    /// the stream is over, either at `[DONE]` or at a malformed payload.
    fn accept(&mut self, data: &str) -> bool {
        let data = data.trim();
        if data.is_empty() {
            return true;
        }
        if data == STREAM_DONE {
            self.saw_done = true;
            return false;
        }
        match serde_json::from_str::<ChatCompletionChunk>(data) {
            Ok(chunk) => {
                if let Some(content) = chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|content| !content.is_empty())
                {
                    self.pending.push_back(Ok(content));
                }
                true
            }
            Err(e) => {
                self.pending.push_back(Err(LlmClientError::InvalidResponse(format!(
                    "malformed stream fragment: {}",
                    e
                ))));
                false
            }
        }
    }
}

/// Turns a server-sent-event body into content fragments, in order.
fn fragment_stream(body: BoxStream<'static, reqwest::Result<Bytes>>) -> LlmTokenStream {
    let state = FragmentState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
        saw_done: false,
    };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => {
                    for data in state.decoder.push(&bytes) {
                        if !state.accept(&data) {
                            state.finished = true;
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    state
                        .pending
                        .push_back(Err(LlmClientError::ApiRequestFailed(e.to_string())));
                    state.finished = true;
                }
                None => {
                    let mut open = true;
                    if let Some(data) = state.decoder.finish() {
                        open = state.accept(&data);
                    }
                    // A body cut off before `[DONE]` is a truncated summary.
                    if open && !state.saw_done {
                        state.pending.push_back(Err(LlmClientError::InvalidResponse(
                            "stream ended before [DONE]".to_string(),
                        )));
                    }
                    state.finished = true;
                }
            }
        }
    }))
}

pub fn create_chat_completion_client(
    settings: &LlmSettings,
) -> Result<ChatCompletionClient, LlmClientError> {
    let (base_url, query) = match settings.provider.as_str() {
        "openai" => (
            settings
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            String::new(),
        ),
        "lmstudio" | "compatible" => (
            settings.base_url.clone().ok_or_else(|| {
                LlmClientError::Configuration(format!(
                    "base_url required for {} provider",
                    settings.provider
                ))
            })?,
            String::new(),
        ),
        "azure" => {
            let endpoint = settings.azure_endpoint.as_ref().ok_or_else(|| {
                LlmClientError::Configuration(
                    "azure_endpoint required for azure provider".to_string(),
                )
            })?;
            (
                format!(
                    "{}/openai/deployments/{}",
                    endpoint.trim_end_matches('/'),
                    settings.chat_model
                ),
                format!("?api-version={}", settings.azure_api_version),
            )
        }
        _ => {
            return Err(LlmClientError::Configuration(format!(
                "unknown provider: {}",
                settings.provider
            )));
        }
    };

    if settings.api_key.trim().is_empty() && settings.provider != "lmstudio" {
        return Err(LlmClientError::Configuration(
            "an API key is required for the summarization model".to_string(),
        ));
    }

    let mut client =
        ChatCompletionClient::new(&base_url, settings.api_key.clone(), settings.chat_model.clone());
    client.provider = settings.provider.clone();
    client.endpoint.push_str(&query);
    client.max_tokens = settings.max_tokens;
    client.temperature = settings.temperature;
    Ok(client)
}
