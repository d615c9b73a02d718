pub mod model;
pub mod service;

pub use model::{Voice, VoiceParams, DEFAULT_LANGUAGE, DEFAULT_SILENCE_MS};
pub use service::VoiceService;
