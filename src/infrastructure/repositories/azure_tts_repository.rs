use super::ssml::{escape_xml, normalize_sentence, signed_percent};
use super::tts_repository::TtsRepository;
use super::voice_catalog_repository::VoiceCatalogRepository;
use crate::domain::voice::{Voice, VoiceParams};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use std::sync::Arc;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const AUDIO_FORMAT: &str = "audio-48khz-192kbitrate-mono-mp3";
const SSML_CONTENT_TYPE: &str = "application/ssml+xml";
const CLIENT_USER_AGENT: &str = "speech-worker";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureVoice {
    short_name: String,
    locale: String,
}

/// Azure Cognitive Services speech implementation over the plain REST API
pub struct AzureTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    subscription_key: String,
}

impl AzureTtsRepository {
    pub fn new(http_client: reqwest::Client, base_url: String, subscription_key: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            subscription_key,
        }
    }

    /// Regional endpoint, e.g. "West Europe" -> https://westeurope.tts.speech.microsoft.com/cognitiveservices
    pub fn endpoint_for_region(region: &str) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices",
            region.replace(' ', "").to_lowercase()
        )
    }

    /// Build the SSML document for one sentence
    fn build_ssml(sentence: &str, params: &VoiceParams) -> String {
        let language = escape_xml(&params.language);
        format!(
            "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' \
             xmlns:mstts='http://www.w3.org/2001/mstts' xml:lang='{language}'>\
             <voice name='{voice}'>\
             <mstts:silence type='Leading-exact' value='{leading}ms'/>\
             <mstts:silence type='Tailing-exact' value='{trailing}ms'/>\
             <prosody rate='{rate}' pitch='{pitch}'>{text}</prosody>\
             </voice></speak>",
            voice = escape_xml(&params.voice),
            leading = params.leading_silence_ms,
            trailing = params.trailing_silence_ms,
            rate = signed_percent(params.speed_percent),
            pitch = signed_percent(params.pitch_percent),
            text = escape_xml(&normalize_sentence(sentence)),
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }
}

#[async_trait]
impl TtsRepository for AzureTtsRepository {
    async fn synthesize(&self, sentence: &str, params: &VoiceParams) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let ssml = Self::build_ssml(sentence, params);

        tracing::debug!(
            voice = %params.voice,
            language = %params.language,
            text_length = sentence.len(),
            "Calling Azure TTS"
        );

        let response = self
            .authorized(self.http_client.post(format!("{}/v1", self.base_url)))
            .header(OUTPUT_FORMAT_HEADER, AUDIO_FORMAT)
            .header(CONTENT_TYPE, SSML_CONTENT_TYPE)
            .body(ssml)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = %params.voice, "Azure TTS request failed");
                format!("Azure TTS request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                voice = %params.voice,
                language = %params.language,
                "Azure TTS rejected the request"
            );
            return Err(format!("Azure TTS returned {}: {}", status, body.trim()));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read Azure TTS audio stream: {}", e))?
            .to_vec();

        if audio_bytes.is_empty() {
            return Err("Azure TTS returned an empty audio stream".to_string());
        }

        tracing::info!(
            provider = "azure",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "Sentence synthesized"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl VoiceCatalogRepository for AzureTtsRepository {
    async fn list_voices(&self) -> Result<Arc<Vec<Voice>>, String> {
        let response = self
            .authorized(self.http_client.get(format!("{}/voices/list", self.base_url)))
            .send()
            .await
            .map_err(|e| format!("Azure voice list request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Azure voice list returned {}", status));
        }

        let voices: Vec<AzureVoice> = response
            .json()
            .await
            .map_err(|e| format!("Invalid Azure voice list: {}", e))?;

        Ok(Arc::new(
            voices
                .into_iter()
                .map(|v| Voice::new(v.short_name, v.locale))
                .collect(),
        ))
    }
}
