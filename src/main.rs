use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use speech_worker::controllers::{job_consumer::SpeechJobConsumer, speech::SpeechController};
use speech_worker::domain::{speech::SpeechJobService, voice::VoiceService};
use speech_worker::infrastructure::config::{Config, LogFormat, SynthesisProvider};
use speech_worker::infrastructure::http::start_http_server;
use speech_worker::infrastructure::media::FfmpegToolkit;
use speech_worker::infrastructure::queue::{SqsJobQueue, SqsResultPublisher};
use speech_worker::infrastructure::repositories::{
    AzureTtsRepository, CachedVoiceCatalog, PollyTtsRepository, TtsRepository,
    VoiceCatalogRepository,
};
use speech_worker::infrastructure::storage::S3ArtifactStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        provider = ?config.synthesis_provider,
        max_concurrent_jobs = config.max_concurrent_jobs,
        "Starting speech worker on {}:{}",
        config.host,
        config.port
    );

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    tracing::info!(
        region = ?aws_config.region(),
        "AWS configuration loaded"
    );

    tokio::fs::create_dir_all(&config.workspace_root).await?;
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Synthesis provider (one client serves both synthesis and the voice catalog)
    tracing::info!("Instantiating synthesis provider...");
    let (tts_repo, provider_catalog): (Arc<dyn TtsRepository>, Arc<dyn VoiceCatalogRepository>) =
        match config.synthesis_provider {
            SynthesisProvider::Azure => {
                let base_url = config
                    .azure_speech_endpoint
                    .clone()
                    .or_else(|| {
                        config
                            .azure_speech_region
                            .as_deref()
                            .map(AzureTtsRepository::endpoint_for_region)
                    })
                    .ok_or("AZURE_SPEECH_REGION or AZURE_SPEECH_ENDPOINT is required")?;
                let key = config
                    .azure_speech_key
                    .clone()
                    .ok_or("AZURE_SPEECH_KEY is required")?;
                let repo = Arc::new(AzureTtsRepository::new(reqwest::Client::new(), base_url, key));
                let tts: Arc<dyn TtsRepository> = repo.clone();
                let catalog: Arc<dyn VoiceCatalogRepository> = repo;
                (tts, catalog)
            }
            SynthesisProvider::Polly => {
                let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
                let repo = Arc::new(PollyTtsRepository::new(polly_client));
                let tts: Arc<dyn TtsRepository> = repo.clone();
                let catalog: Arc<dyn VoiceCatalogRepository> = repo;
                (tts, catalog)
            }
        };
    let voice_catalog = Arc::new(CachedVoiceCatalog::new(
        provider_catalog,
        config.voice_cache_ttl(),
    ));

    // 2. Audio tools, storage and queues
    tracing::info!("Instantiating audio tools, storage and queues...");
    let toolkit = Arc::new(FfmpegToolkit::new(
        config.ffprobe_path.clone(),
        config.ffmpeg_path.clone(),
        config.tool_timeout(),
    ));
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));
    let artifact_store = Arc::new(S3ArtifactStore::new(s3_client));
    let sqs_client = Arc::new(aws_sdk_sqs::Client::new(&aws_config));
    let result_publisher = Arc::new(SqsResultPublisher::new(
        sqs_client.clone(),
        config.result_queue_url.clone(),
    ));
    let job_queue = Arc::new(SqsJobQueue::new(sqs_client, config.job_queue_url.clone()));

    // 3. Services
    tracing::info!("Instantiating services...");
    let voice_service = Arc::new(VoiceService::new(voice_catalog));
    let speech_job_service = Arc::new(SpeechJobService::new(
        voice_service.clone(),
        tts_repo,
        toolkit,
        artifact_store,
        config.artifact_container.clone(),
        result_publisher,
        config.workspace_root.clone(),
    ));

    // 4. Entry points: queue consumer and HTTP controllers
    tracing::info!("Instantiating controllers...");
    let consumer = Arc::new(SpeechJobConsumer::new(
        job_queue,
        speech_job_service,
        config.max_concurrent_jobs,
    ));
    let speech_controller = Arc::new(SpeechController::new(voice_service));

    let consumer_task = tokio::spawn(consumer.run());

    tokio::select! {
        result = start_http_server(config.clone(), speech_controller) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
    }

    consumer_task.abort();
    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "speech_worker=debug,tower_http=debug"
    } else {
        "speech_worker=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
