use crate::domain::voice::VoiceParams;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying provider (Azure Cognitive Services REST, AWS Polly SDK).
///
/// Implementations synthesize exactly one sentence per call and never retry:
/// any provider error is returned to the caller as-is.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one sentence with the job's voice parameters
    ///
    /// Returns MP3 audio for the sentence, including the configured
    /// leading and trailing silence.
    ///
    /// # Errors
    /// Returns the provider's failure reason (unreachable service,
    /// rejected voice or locale, non-success response)
    async fn synthesize(&self, sentence: &str, params: &VoiceParams) -> Result<Vec<u8>, String>;
}
