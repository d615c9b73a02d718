use serde::{Deserialize, Serialize};

/// Locale used when a job does not request one
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Leading and trailing silence applied when a job does not set pauses
pub const DEFAULT_SILENCE_MS: u32 = 1000;

/// A voice offered by the synthesis provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub short_name: String,
    pub locale: String,
}

impl Voice {
    pub fn new(short_name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            locale: locale.into(),
        }
    }
}

/// Synthesis parameters resolved once per job and reused for every sentence
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    pub voice: String,
    pub language: String,
    /// Percentage offset from the voice's natural pitch, 0 is neutral
    pub pitch_percent: f32,
    /// Percentage offset from the voice's natural rate, 0 is neutral
    pub speed_percent: f32,
    pub leading_silence_ms: u32,
    pub trailing_silence_ms: u32,
}

impl VoiceParams {
    pub fn new(voice: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            language: language.into(),
            pitch_percent: 0.0,
            speed_percent: 0.0,
            leading_silence_ms: DEFAULT_SILENCE_MS,
            trailing_silence_ms: DEFAULT_SILENCE_MS,
        }
    }
}
