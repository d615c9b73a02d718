use super::error::SpeechJobError;
use super::workspace::Workspace;
use crate::infrastructure::media::AudioToolkit;
use std::sync::Arc;

/// Container format of synthesized segments and the merged artifact
pub const AUDIO_EXTENSION: &str = "mp3";

/// One synthesized sentence persisted in the workspace
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    /// Position of the sentence in the job, defines merge order
    pub index: usize,
    pub file_name: String,
    pub size_bytes: usize,
    pub duration_ms: u64,
}

pub fn segment_file_name(index: usize) -> String {
    format!("{}.{}", index, AUDIO_EXTENSION)
}

/// Writes synthesized audio to the workspace and measures its duration
pub struct SegmentMaterializer {
    toolkit: Arc<dyn AudioToolkit>,
}

impl SegmentMaterializer {
    pub fn new(toolkit: Arc<dyn AudioToolkit>) -> Self {
        Self { toolkit }
    }

    pub async fn materialize(
        &self,
        workspace: &Workspace,
        index: usize,
        audio: Vec<u8>,
    ) -> Result<AudioSegment, SpeechJobError> {
        let file_name = segment_file_name(index);
        tokio::fs::write(workspace.file_path(&file_name), &audio)
            .await
            .map_err(|e| SpeechJobError::Segment(format!("{}: {}", file_name, e)))?;

        let duration_ms = self
            .toolkit
            .probe_duration(workspace.path(), &file_name)
            .await
            .map_err(SpeechJobError::Probe)?;

        Ok(AudioSegment {
            index,
            file_name,
            size_bytes: audio.len(),
            duration_ms,
        })
    }
}
