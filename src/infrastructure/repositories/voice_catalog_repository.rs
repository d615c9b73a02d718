use crate::domain::voice::Voice;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Lists the voices a synthesis provider offers
#[async_trait]
pub trait VoiceCatalogRepository: Send + Sync {
    async fn list_voices(&self) -> Result<Arc<Vec<Voice>>, String>;
}

const CATALOG_KEY: &str = "voices";

/// Caches the provider's voice list so per-job voice resolution and the
/// catalog endpoints don't call the provider every time
pub struct CachedVoiceCatalog {
    inner: Arc<dyn VoiceCatalogRepository>,
    cache: Cache<&'static str, Arc<Vec<Voice>>>,
}

impl CachedVoiceCatalog {
    pub fn new(inner: Arc<dyn VoiceCatalogRepository>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { inner, cache }
    }
}

#[async_trait]
impl VoiceCatalogRepository for CachedVoiceCatalog {
    async fn list_voices(&self) -> Result<Arc<Vec<Voice>>, String> {
        let inner = self.inner.clone();
        self.cache
            .try_get_with(CATALOG_KEY, async move {
                let voices = inner.list_voices().await?;
                tracing::info!(voice_count = voices.len(), "Voice catalog refreshed");
                Ok::<_, String>(voices)
            })
            .await
            .map_err(|e| e.to_string())
    }
}
