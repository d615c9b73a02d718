use super::ssml::{escape_xml, normalize_sentence, signed_percent};
use super::tts_repository::TtsRepository;
use super::voice_catalog_repository::VoiceCatalogRepository;
use crate::domain::voice::{Voice, VoiceParams};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, LanguageCode, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// Polly rejects <break> elements longer than ten seconds
const MAX_BREAK_MS: u32 = 10_000;

/// Slowest speaking rate Polly accepts, as a percentage of normal
const MIN_RATE_PERCENT: f32 = 20.0;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Polly expresses rate as a percentage of normal speed, so a +10% offset is 110%
    fn rate_percent(speed_offset: f32) -> f32 {
        (100.0 + speed_offset).max(MIN_RATE_PERCENT)
    }

    /// Build the SSML document for one sentence
    fn build_ssml(sentence: &str, params: &VoiceParams) -> String {
        format!(
            "<speak><break time=\"{leading}ms\"/>\
             <prosody rate=\"{rate}%\" pitch=\"{pitch}\">{text}</prosody>\
             <break time=\"{trailing}ms\"/></speak>",
            leading = params.leading_silence_ms.min(MAX_BREAK_MS),
            trailing = params.trailing_silence_ms.min(MAX_BREAK_MS),
            rate = Self::rate_percent(params.speed_percent),
            pitch = signed_percent(params.pitch_percent),
            text = escape_xml(&normalize_sentence(sentence)),
        )
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, sentence: &str, params: &VoiceParams) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_id = VoiceId::from(params.voice.as_str());
        // Prosody pitch is only honoured by the standard engine
        let engine = Engine::Standard;

        tracing::info!(
            voice = %params.voice,
            language = %params.language,
            engine = ?engine,
            output_format = "Mp3",
            text_length = sentence.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(Self::build_ssml(sentence, params))
            .text_type(TextType::Ssml)
            .voice_id(voice_id)
            .language_code(LanguageCode::from(params.language.as_str()))
            .output_format(OutputFormat::Mp3)
            .engine(engine)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice = %params.voice,
                    language = %params.language,
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        if audio_bytes.is_empty() {
            return Err("AWS Polly returned an empty audio stream".to_string());
        }

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "Sentence synthesized"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl VoiceCatalogRepository for PollyTtsRepository {
    async fn list_voices(&self) -> Result<Arc<Vec<Voice>>, String> {
        let mut voices = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .polly_client
                .describe_voices()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| format!("AWS Polly describe_voices failed: {}", e))?;

            for voice in output.voices.unwrap_or_default() {
                if let (Some(id), Some(language)) = (voice.id(), voice.language_code()) {
                    voices.push(Voice::new(id.as_str(), language.as_str()));
                }
            }

            match output.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(Arc::new(voices))
    }
}
