pub mod azure_tts_repository;
pub mod polly_tts_repository;
pub mod ssml;
pub mod tts_repository;
pub mod voice_catalog_repository;

pub use azure_tts_repository::AzureTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;
pub use voice_catalog_repository::{CachedVoiceCatalog, VoiceCatalogRepository};
