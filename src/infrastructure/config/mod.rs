use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Synthesis
    pub synthesis_provider: SynthesisProvider,
    pub azure_speech_key: Option<String>,
    pub azure_speech_region: Option<String>,
    pub azure_speech_endpoint: Option<String>,
    pub voice_cache_ttl_secs: u64,
    // Queues
    pub job_queue_url: String,
    pub result_queue_url: String,
    pub max_concurrent_jobs: usize,
    // Storage
    pub artifact_container: String,
    // Audio tools
    pub ffprobe_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub tool_timeout_secs: u64,
    pub workspace_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisProvider {
    Azure,
    Polly,
}

impl SynthesisProvider {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "azure" => Ok(SynthesisProvider::Azure),
            "polly" => Ok(SynthesisProvider::Polly),
            other => Err(format!("unknown SYNTHESIS_PROVIDER '{}'", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            synthesis_provider: SynthesisProvider::parse(
                &env::var("SYNTHESIS_PROVIDER").unwrap_or_else(|_| "azure".to_string()),
            )?,
            azure_speech_key: env::var("AZURE_SPEECH_KEY").ok(),
            azure_speech_region: env::var("AZURE_SPEECH_REGION").ok(),
            azure_speech_endpoint: env::var("AZURE_SPEECH_ENDPOINT").ok(),
            voice_cache_ttl_secs: env::var("VOICE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,
            job_queue_url: env::var("JOB_QUEUE_URL")?,
            result_queue_url: env::var("RESULT_QUEUE_URL")?,
            max_concurrent_jobs: env::var("MAX_CONCURRENT_JOBS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()?,
            artifact_container: env::var("ARTIFACT_CONTAINER")
                .unwrap_or_else(|_| "jobsdata".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH")
                .unwrap_or_else(|_| "ffprobe".to_string())
                .into(),
            ffmpeg_path: env::var("FFMPEG_PATH")
                .unwrap_or_else(|_| "ffmpeg".to_string())
                .into(),
            tool_timeout_secs: env::var("TOOL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            workspace_root: env::var("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_jobs == 0 {
            return Err("MAX_CONCURRENT_JOBS must be at least 1".to_string());
        }
        if self.synthesis_provider == SynthesisProvider::Azure {
            if self.azure_speech_key.is_none() {
                return Err("AZURE_SPEECH_KEY is required for the azure provider".to_string());
            }
            if self.azure_speech_region.is_none() && self.azure_speech_endpoint.is_none() {
                return Err(
                    "AZURE_SPEECH_REGION or AZURE_SPEECH_ENDPOINT is required for the azure provider"
                        .to_string(),
                );
            }
        }
        Ok(())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn voice_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.voice_cache_ttl_secs)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
