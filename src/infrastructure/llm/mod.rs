mod chat_completion_client;
mod sse_decoder;

pub use chat_completion_client::{ChatCompletionClient, create_chat_completion_client};
pub use sse_decoder::SseDecoder;
