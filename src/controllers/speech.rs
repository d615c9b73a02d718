use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::voice::VoiceService,
    error::{AppError, AppResult},
};

/// Read-through views of the synthesis provider's voice catalog
pub struct SpeechController {
    voice_service: Arc<VoiceService>,
}

impl SpeechController {
    pub fn new(voice_service: Arc<VoiceService>) -> Self {
        Self { voice_service }
    }

    /// GET /api/speech/getAllSpeechTypes/:locale - Voice names for one locale
    pub async fn get_speech_types_for_locale(
        State(controller): State<Arc<SpeechController>>,
        Path(locale): Path<String>,
    ) -> AppResult<Json<Vec<String>>> {
        let locale = locale.trim();
        if locale.is_empty() {
            return Err(AppError::BadRequest("Invalid locale".to_string()));
        }

        let names = controller.voice_service.list_voice_names(Some(locale)).await?;
        Ok(Json(names))
    }

    /// GET /api/speech/getAllSpeechTypes - Voice names across all locales
    pub async fn get_all_speech_types(
        State(controller): State<Arc<SpeechController>>,
    ) -> AppResult<Json<Vec<String>>> {
        let names = controller.voice_service.list_voice_names(None).await?;
        Ok(Json(names))
    }

    /// GET /api/speech/getAllSpeechLanguages - Locales with at least one voice
    pub async fn get_all_speech_languages(
        State(controller): State<Arc<SpeechController>>,
    ) -> AppResult<Json<Vec<String>>> {
        let locales = controller.voice_service.list_locales().await?;
        Ok(Json(locales))
    }
}
