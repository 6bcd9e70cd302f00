mod audio_converter;
mod llm_client;
mod task_store;
mod transcription_engine;
mod upload_store;

pub use audio_converter::{AudioConverter, ConversionError};
pub use llm_client::{LlmClient, LlmClientError, LlmTokenStream};
pub use task_store::{TaskStore, TaskStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use upload_store::{UploadStore, UploadStoreError};
