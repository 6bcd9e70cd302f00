mod ffmpeg_converter;
mod process;
mod whisper_cli_engine;

pub use ffmpeg_converter::{FfmpegConverter, TARGET_CHANNELS, TARGET_CODEC, TARGET_SAMPLE_RATE};
pub use whisper_cli_engine::{AUTO_LANGUAGE, WhisperCliEngine};
