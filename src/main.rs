use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use audiogist::application::ports::{LlmClient, TaskStore};
use audiogist::application::services::{
    RetentionSweeper, Summarizer, SummaryMode, TaskPipeline, TaskService, spawn_worker_pool,
    task_queue,
};
use audiogist::infrastructure::audio::{FfmpegConverter, WhisperCliEngine};
use audiogist::infrastructure::llm::create_chat_completion_client;
use audiogist::infrastructure::observability::{TracingConfig, init_tracing};
use audiogist::infrastructure::persistence::InMemoryTaskStore;
use audiogist::infrastructure::storage::LocalUploadStore;
use audiogist::presentation::auth::{AccessGate, session_key};
use audiogist::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let tracing_config = TracingConfig::new(
        environment.as_str(),
        settings.logging.json,
        settings.logging.level.as_deref(),
    );
    init_tracing(&tracing_config, settings.server.port);

    tokio::fs::create_dir_all(&settings.storage.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory {}",
                settings.storage.output_dir.display()
            )
        })?;

    let task_store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    let upload_store = Arc::new(
        LocalUploadStore::new(settings.storage.upload_dir.clone())
            .context("Failed to prepare upload directory")?,
    );

    let chat_client = create_chat_completion_client(&settings.llm)
        .context("Failed to configure summarization client")?;
    tracing::info!(
        provider = %settings.llm.provider,
        model = chat_client.model(),
        "Summarization client configured"
    );
    let llm_client: Arc<dyn LlmClient> = Arc::new(chat_client);
    let mode = if settings.llm.stream {
        SummaryMode::Stream
    } else {
        SummaryMode::Complete
    };
    let summarizer = Arc::new(Summarizer::new(llm_client, mode));
    let summarizer_mode = summarizer.mode();

    let pipeline = Arc::new(TaskPipeline::new(
        Arc::clone(&task_store),
        Arc::new(FfmpegConverter::new(settings.conversion.ffmpeg_path.clone())),
        Arc::new(WhisperCliEngine::new(
            settings.transcription.executable.clone(),
            settings.transcription.model_path.clone(),
            settings.transcription.language.clone(),
        )),
        summarizer,
        settings.storage.output_dir.clone(),
        settings.retention.cleanup_after_processing,
    ));

    let (queue, consumer) = task_queue(settings.worker.queue_capacity);
    let workers = spawn_worker_pool(settings.worker.pool_size, consumer, pipeline);
    tracing::info!(
        workers = workers.len(),
        queue_capacity = queue.capacity(),
        summary_mode = ?summarizer_mode,
        "Task workers running"
    );

    if settings.retention.record_ttl_secs > 0 {
        RetentionSweeper::new(
            Arc::clone(&task_store),
            settings.storage.output_dir.clone(),
            Duration::from_secs(settings.retention.record_ttl_secs),
            Duration::from_secs(settings.retention.sweep_interval_secs.max(1)),
        )
        .spawn();
    }

    let access = AccessGate::new(settings.access_secret());
    let session_secret = settings
        .auth
        .session_secret
        .as_deref()
        .filter(|s| !s.is_empty());
    if access.is_enabled() && session_secret.is_none() {
        tracing::warn!("No session secret configured; sessions end when the process restarts");
    }
    let cookie_key = session_key(session_secret);

    let task_service = Arc::new(TaskService::new(task_store, upload_store, queue));
    let state = AppState::new(
        task_service,
        access,
        cookie_key,
        settings.max_upload_bytes(),
    );

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
