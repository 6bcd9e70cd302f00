mod environment;
mod settings;

pub use environment::{Environment, UnknownEnvironment};
pub use settings::{
    AuthSettings, ConversionSettings, LlmSettings, LoggingSettings, RetentionSettings,
    ServerSettings, Settings, StorageSettings, TranscriptionSettings, WorkerSettings,
};
