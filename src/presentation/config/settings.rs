use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

/// Variables understood by earlier deployments, mapped onto settings keys.
const LEGACY_ENV_KEYS: [(&str, &str); 7] = [
    ("UPLOAD_FOLDER", "storage.upload_dir"),
    ("OUTPUT_FOLDER", "storage.output_dir"),
    ("WHISPER_EXECUTABLE", "transcription.executable"),
    ("WHISPER_MODEL", "transcription.model_path"),
    ("OPENAI_API_KEY", "llm.api_key"),
    ("APIKEY", "auth.access_secret"),
    ("SECRET_KEY", "auth.session_secret"),
];

/// One hundred years.
const MAX_RECORD_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub conversion: ConversionSettings,
    pub transcription: TranscriptionSettings,
    pub llm: LlmSettings,
    pub worker: WorkerSettings,
    pub retention: RetentionSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionSettings {
    pub ffmpeg_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub executable: PathBuf,
    pub model_path: PathBuf,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: String,
    pub base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_api_version: String,
    pub api_key: String,
    pub chat_model: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub pool_size: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionSettings {
    pub cleanup_after_processing: bool,
    /// Zero keeps finished records for the whole process lifetime.
    pub record_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub access_secret: Option<String>,
    pub session_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub json: bool,
}

impl Settings {
    /// Defaults, then `config/{environment}.toml` if present, then
    /// `APP_`-prefixed variables (`APP_STORAGE__UPLOAD_DIR`), then the legacy
    /// variable names.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.max_upload_mb", 512)?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.output_dir", "outputs")?
            .set_default("conversion.ffmpeg_path", "ffmpeg")?
            .set_default("transcription.executable", "./whisper-cli")?
            .set_default("transcription.model_path", "models/ggml-large-v3-turbo.bin")?
            .set_default("transcription.language", "auto")?
            .set_default("llm.provider", "openai")?
            .set_default("llm.azure_api_version", "2024-02-01")?
            .set_default("llm.api_key", "")?
            .set_default("llm.chat_model", "gpt-4o")?
            .set_default("llm.stream", false)?
            .set_default("worker.pool_size", 1)?
            .set_default("worker.queue_capacity", 64)?
            .set_default("retention.cleanup_after_processing", false)?
            .set_default("retention.record_ttl_secs", 86_400)?
            .set_default("retention.sweep_interval_secs", 300)?
            .set_default("logging.json", false)?
            .add_source(File::with_name(&environment.config_source()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        for (variable, key) in LEGACY_ENV_KEYS {
            let value = std::env::var(variable).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker.pool_size == 0 {
            return Err(ConfigError::Message(
                "worker.pool_size must be at least 1".to_string(),
            ));
        }
        if self.worker.queue_capacity == 0 {
            return Err(ConfigError::Message(
                "worker.queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.retention.record_ttl_secs > MAX_RECORD_TTL_SECS {
            return Err(ConfigError::Message(format!(
                "retention.record_ttl_secs must not exceed {}",
                MAX_RECORD_TTL_SECS
            )));
        }
        if self.llm.api_key.trim().is_empty() && self.llm.provider != "lmstudio" {
            return Err(ConfigError::Message(
                "llm.api_key (or OPENAI_API_KEY) is not set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Empty secrets count as unset.
    pub fn access_secret(&self) -> Option<&str> {
        self.auth
            .access_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}
