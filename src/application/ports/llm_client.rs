use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

pub type LlmTokenStream = Pin<Box<dyn Stream<Item = Result<String, LlmClientError>> + Send>>;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmClientError>;

    /// Streams the completion as content fragments in arrival order.
    async fn complete_stream(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<LlmTokenStream, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("configuration: {0}")]
    Configuration(String),
}
