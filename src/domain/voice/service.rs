use super::model::{VoiceParams, DEFAULT_LANGUAGE, DEFAULT_SILENCE_MS};
use crate::domain::speech::{RequestSpeech, SpeechJobError};
use crate::infrastructure::repositories::VoiceCatalogRepository;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct VoiceService {
    catalog: Arc<dyn VoiceCatalogRepository>,
}

impl VoiceService {
    pub fn new(catalog: Arc<dyn VoiceCatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Distinct voice short names, sorted, optionally restricted to one locale
    pub async fn list_voice_names(&self, locale: Option<&str>) -> Result<Vec<String>, SpeechJobError> {
        let voices = self.catalog.list_voices().await.map_err(SpeechJobError::Provider)?;
        let names: BTreeSet<&str> = voices
            .iter()
            .filter(|v| locale.map_or(true, |l| v.locale.eq_ignore_ascii_case(l)))
            .map(|v| v.short_name.as_str())
            .collect();
        Ok(names.into_iter().map(String::from).collect())
    }

    /// Distinct locales, sorted
    pub async fn list_locales(&self) -> Result<Vec<String>, SpeechJobError> {
        let voices = self.catalog.list_voices().await.map_err(SpeechJobError::Provider)?;
        let locales: BTreeSet<&str> = voices.iter().map(|v| v.locale.as_str()).collect();
        Ok(locales.into_iter().map(String::from).collect())
    }

    /// Resolve the voice parameters for a job.
    ///
    /// An explicit `speechType` is used as-is; otherwise the first catalog voice
    /// for the requested locale is picked. Called once per job, never per sentence.
    pub async fn resolve_params(&self, request: &RequestSpeech) -> Result<VoiceParams, SpeechJobError> {
        let language = request
            .speech_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();

        let voice = match request.speech_type.as_deref().map(str::trim) {
            Some(voice) if !voice.is_empty() => voice.to_string(),
            _ => self.default_voice_for(&language).await?,
        };

        tracing::info!(
            job_id = %request.job_id,
            voice = %voice,
            language = %language,
            "Voice resolved for job"
        );

        Ok(VoiceParams {
            voice,
            language,
            pitch_percent: request.speech_pitch.unwrap_or(0.0),
            speed_percent: request.speech_speed.unwrap_or(0.0),
            leading_silence_ms: request.speech_pause_before_in_millis.unwrap_or(DEFAULT_SILENCE_MS),
            trailing_silence_ms: request.speech_pause_after_in_millis.unwrap_or(DEFAULT_SILENCE_MS),
        })
    }

    async fn default_voice_for(&self, language: &str) -> Result<String, SpeechJobError> {
        let voices = self.catalog.list_voices().await.map_err(SpeechJobError::Provider)?;
        voices
            .iter()
            .find(|v| v.locale == language)
            .map(|v| v.short_name.clone())
            .ok_or_else(|| {
                SpeechJobError::Provider(format!("no voice available for locale '{}'", language))
            })
    }
}
