use super::error::SpeechJobError;
use super::segment::{AudioSegment, AUDIO_EXTENSION};
use super::workspace::Workspace;
use crate::infrastructure::media::AudioToolkit;
use std::path::PathBuf;
use std::sync::Arc;

pub fn merged_file_name() -> String {
    format!("output.{}", AUDIO_EXTENSION)
}

/// Concatenates a job's segments, in index order, into one file
pub struct AudioMerger {
    toolkit: Arc<dyn AudioToolkit>,
}

impl AudioMerger {
    pub fn new(toolkit: Arc<dyn AudioToolkit>) -> Self {
        Self { toolkit }
    }

    pub async fn merge(
        &self,
        workspace: &Workspace,
        segments: &[AudioSegment],
    ) -> Result<PathBuf, SpeechJobError> {
        let mut ordered: Vec<&AudioSegment> = segments.iter().collect();
        ordered.sort_by_key(|s| s.index);
        let file_names: Vec<String> = ordered.iter().map(|s| s.file_name.clone()).collect();

        let merged = self
            .toolkit
            .merge_sequential(workspace.path(), &file_names, &merged_file_name())
            .await
            .map_err(SpeechJobError::Merge)?;

        tracing::debug!(
            segment_count = file_names.len(),
            merged = %merged.display(),
            "Segments merged"
        );
        Ok(merged)
    }
}
