use super::error::SpeechJobError;
use super::segment::AUDIO_EXTENSION;
use crate::infrastructure::storage::ArtifactStore;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const DURATIONS_METADATA_KEY: &str = "individual-durations-in-millis";
pub const TOTAL_DURATION_METADATA_KEY: &str = "total-duration-in-millis";

/// Object key of a job's merged artifact inside the container
pub fn artifact_key(job_id: &str) -> String {
    format!("{}/tts.{}", job_id, AUDIO_EXTENSION)
}

pub fn duration_metadata(durations: &[u64]) -> HashMap<String, String> {
    let joined = durations
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let total: u64 = durations.iter().sum();

    HashMap::from([
        (DURATIONS_METADATA_KEY.to_string(), joined),
        (TOTAL_DURATION_METADATA_KEY.to_string(), total.to_string()),
    ])
}

/// Uploads merged audio and tags it with its durations
pub struct ArtifactPublisher {
    store: Arc<dyn ArtifactStore>,
    container: String,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ArtifactStore>, container: String) -> Self {
        Self { store, container }
    }

    /// Upload then attach metadata. Returns the artifact link `<container>/<key>`.
    pub async fn publish(
        &self,
        job_id: &str,
        merged: &Path,
        durations: &[u64],
    ) -> Result<String, SpeechJobError> {
        let key = artifact_key(job_id);

        self.store
            .upload(&self.container, &key, merged)
            .await
            .map_err(SpeechJobError::Storage)?;

        self.store
            .set_metadata(&self.container, &key, duration_metadata(durations))
            .await
            .map_err(SpeechJobError::Storage)?;

        let file_link = format!("{}/{}", self.container, key);
        tracing::info!(job_id = job_id, file_link = %file_link, "Merged audio stored");
        Ok(file_link)
    }
}
