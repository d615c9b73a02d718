use super::dto::{JobIdentifiers, RequestSpeech, SpeechResult};
use super::error::SpeechJobError;
use super::merger::AudioMerger;
use super::publisher::ArtifactPublisher;
use super::segment::SegmentMaterializer;
use super::workspace::Workspace;
use crate::domain::voice::VoiceService;
use crate::infrastructure::media::AudioToolkit;
use crate::infrastructure::queue::ResultPublisher;
use crate::infrastructure::repositories::TtsRepository;
use crate::infrastructure::storage::ArtifactStore;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

struct PipelineOutput {
    file_link: String,
    durations: Vec<u64>,
}

pub struct SpeechJobService {
    voice_service: Arc<VoiceService>,
    tts_repo: Arc<dyn TtsRepository>,
    materializer: SegmentMaterializer,
    merger: AudioMerger,
    publisher: ArtifactPublisher,
    result_publisher: Arc<dyn ResultPublisher>,
    workspace_root: PathBuf,
}

impl SpeechJobService {
    pub fn new(
        voice_service: Arc<VoiceService>,
        tts_repo: Arc<dyn TtsRepository>,
        toolkit: Arc<dyn AudioToolkit>,
        artifact_store: Arc<dyn ArtifactStore>,
        artifact_container: String,
        result_publisher: Arc<dyn ResultPublisher>,
        workspace_root: PathBuf,
    ) -> Self {
        Self {
            voice_service,
            tts_repo,
            materializer: SegmentMaterializer::new(toolkit.clone()),
            merger: AudioMerger::new(toolkit),
            publisher: ArtifactPublisher::new(artifact_store, artifact_container),
            result_publisher,
            workspace_root,
        }
    }
}

#[async_trait]
pub trait SpeechJobServiceApi: Send + Sync {
    /// Run one speech job to completion
    ///
    /// This operation:
    /// - Synthesizes, writes and probes every sentence in order
    /// - Merges the segments and stores the merged audio
    /// - Publishes exactly one success or failure result
    /// - Removes the job workspace after the result is published
    ///
    /// Pipeline failures are reported through the published result. An error
    /// is returned only when the result itself could not be delivered.
    async fn handle(&self, request: RequestSpeech) -> Result<SpeechResult, SpeechJobError>;

    /// Publish a failure result for a job whose message could not be fully
    /// decoded. Nothing is synthesized.
    async fn reject(&self, job: JobIdentifiers, reason: String) -> Result<SpeechResult, SpeechJobError>;
}

#[async_trait]
impl SpeechJobServiceApi for SpeechJobService {
    async fn handle(&self, request: RequestSpeech) -> Result<SpeechResult, SpeechJobError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            job_id = %request.job_id,
            video_id = %request.video_id,
            user_id = %request.user_id,
            sentence_count = request.sentences.len(),
            "Speech job received"
        );

        let (outcome, workspace) = match Workspace::create(&self.workspace_root) {
            Ok(workspace) => (self.run(&request, &workspace).await, Some(workspace)),
            Err(e) => (Err(SpeechJobError::from(e)), None),
        };

        let result = match outcome {
            Ok(output) => {
                tracing::info!(
                    job_id = %request.job_id,
                    file_link = %output.file_link,
                    segment_count = output.durations.len(),
                    latency_ms = start_time.elapsed().as_millis(),
                    "Speech job completed"
                );
                SpeechResult::success(&request, output.file_link, output.durations)
            }
            Err(e) => {
                tracing::error!(
                    job_id = %request.job_id,
                    error = %e,
                    latency_ms = start_time.elapsed().as_millis(),
                    "Speech job failed"
                );
                SpeechResult::failure(&request, e.to_string())
            }
        };

        let delivery = self.deliver(&result).await;

        if let Some(workspace) = workspace {
            self.release(&request.job_id, workspace);
        }

        delivery?;
        Ok(result)
    }

    async fn reject(&self, job: JobIdentifiers, reason: String) -> Result<SpeechResult, SpeechJobError> {
        let error = SpeechJobError::Invalid(reason);
        tracing::error!(
            job_id = %job.job_id,
            video_id = %job.video_id,
            error = %error,
            "Speech job rejected"
        );

        let result = SpeechResult::rejected(&job, error.to_string());
        self.deliver(&result).await?;
        Ok(result)
    }
}

impl SpeechJobService {
    async fn run(
        &self,
        request: &RequestSpeech,
        workspace: &Workspace,
    ) -> Result<PipelineOutput, SpeechJobError> {
        Self::validate(request)?;

        // 1. Resolve the voice once for the whole job
        let params = self.voice_service.resolve_params(request).await?;

        // 2. Synthesize, persist and probe each sentence strictly in order
        let mut segments = Vec::with_capacity(request.sentences.len());
        for (index, sentence) in request.sentences.iter().enumerate() {
            let audio = self
                .tts_repo
                .synthesize(sentence, &params)
                .await
                .map_err(SpeechJobError::Provider)?;

            let segment = self.materializer.materialize(workspace, index, audio).await?;

            tracing::info!(
                job_id = %request.job_id,
                segment_index = index,
                audio_size_bytes = segment.size_bytes,
                duration_ms = segment.duration_ms,
                "Segment synthesized"
            );
            segments.push(segment);
        }

        // 3. Merge without re-encoding
        let merged = self.merger.merge(workspace, &segments).await?;

        // 4. Store the artifact with its durations
        let durations: Vec<u64> = segments.iter().map(|s| s.duration_ms).collect();
        let file_link = self
            .publisher
            .publish(&request.job_id, &merged, &durations)
            .await?;

        Ok(PipelineOutput {
            file_link,
            durations,
        })
    }

    async fn deliver(&self, result: &SpeechResult) -> Result<(), SpeechJobError> {
        self.result_publisher.publish(result).await.map_err(|e| {
            tracing::error!(job_id = %result.job_id, error = %e, "Speech result not delivered");
            SpeechJobError::Reporting(e)
        })
    }

    fn validate(request: &RequestSpeech) -> Result<(), SpeechJobError> {
        if request.job_id.trim().is_empty() {
            return Err(SpeechJobError::Invalid("job id cannot be empty".to_string()));
        }
        if request.sentences.is_empty() {
            return Err(SpeechJobError::Invalid("no sentences to synthesize".to_string()));
        }
        if let Some(index) = request.sentences.iter().position(|s| s.trim().is_empty()) {
            return Err(SpeechJobError::Invalid(format!("sentence {} is empty", index)));
        }
        Ok(())
    }

    /// Best-effort removal; failures are logged and never change the job outcome
    fn release(&self, job_id: &str, workspace: Workspace) {
        let path = workspace.path().to_path_buf();
        match workspace.cleanup() {
            Ok(()) => tracing::debug!(job_id = job_id, workspace = %path.display(), "Workspace removed"),
            Err(e) => tracing::error!(
                job_id = job_id,
                workspace = %path.display(),
                error = %e,
                "Workspace cleanup failed"
            ),
        }
    }
}
