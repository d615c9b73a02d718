use async_trait::async_trait;
use parking_lot::Mutex;
use speech_worker::domain::speech::{
    JobIdentifiers, RequestSpeech, SpeechJobError, SpeechJobServiceApi, SpeechResult,
};
use speech_worker::domain::voice::{Voice, VoiceParams};
use speech_worker::infrastructure::media::AudioToolkit;
use speech_worker::infrastructure::queue::{JobQueue, QueueMessage, ResultPublisher};
use speech_worker::infrastructure::repositories::{TtsRepository, VoiceCatalogRepository};
use speech_worker::infrastructure::storage::ArtifactStore;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Languages the fake provider accepts
const SUPPORTED_LANGUAGES: &[&str] = &["en-US", "es-ES"];

/// Each byte of fake audio "plays" for this long
const MILLIS_PER_BYTE: u64 = 100;

/// Bytes the fake provider returns for a sentence
pub fn fake_audio(sentence: &str) -> Vec<u8> {
    format!("[{}]", sentence).into_bytes()
}

/// Duration the fake probe reports for a sentence's audio
pub fn fake_duration(sentence: &str) -> u64 {
    fake_audio(sentence).len() as u64 * MILLIS_PER_BYTE
}

// ---------------------------------------------------------------------------
// Synthesis provider
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTts {
    calls: Mutex<Vec<(String, VoiceParams)>>,
    fail_at: Mutex<Option<usize>>,
}

impl FakeTts {
    /// Fail the synthesis call with this zero-based index
    pub fn fail_at(&self, index: usize) {
        *self.fail_at.lock() = Some(index);
    }

    pub fn sentences(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn params(&self) -> Vec<VoiceParams> {
        self.calls.lock().iter().map(|(_, p)| p.clone()).collect()
    }
}

#[async_trait]
impl TtsRepository for FakeTts {
    async fn synthesize(&self, sentence: &str, params: &VoiceParams) -> Result<Vec<u8>, String> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push((sentence.to_string(), params.clone()));
            calls.len() - 1
        };

        if !SUPPORTED_LANGUAGES.contains(&params.language.as_str()) {
            return Err(format!("language '{}' is not supported", params.language));
        }
        if *self.fail_at.lock() == Some(index) {
            return Err("provider unavailable".to_string());
        }
        Ok(fake_audio(sentence))
    }
}

// ---------------------------------------------------------------------------
// Voice catalog
// ---------------------------------------------------------------------------

pub struct FakeVoiceCatalog {
    voices: Arc<Vec<Voice>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeVoiceCatalog {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices: Arc::new(voices),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceCatalogRepository for FakeVoiceCatalog {
    async fn list_voices(&self) -> Result<Arc<Vec<Voice>>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err("voice list unavailable".to_string());
        }
        Ok(self.voices.clone())
    }
}

// ---------------------------------------------------------------------------
// ffprobe / ffmpeg
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeToolkit {
    workdirs: Mutex<Vec<PathBuf>>,
    probed: Mutex<Vec<String>>,
    merges: Mutex<Vec<Vec<String>>>,
    fail_probe_for: Mutex<Option<String>>,
    fail_merge: AtomicBool,
}

impl FakeToolkit {
    /// Make the probe exit with status 1 for this file
    pub fn fail_probe_for(&self, file_name: &str) {
        *self.fail_probe_for.lock() = Some(file_name.to_string());
    }

    pub fn fail_merge(&self) {
        self.fail_merge.store(true, Ordering::SeqCst);
    }

    pub fn workdirs(&self) -> Vec<PathBuf> {
        self.workdirs.lock().clone()
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().clone()
    }

    pub fn merges(&self) -> Vec<Vec<String>> {
        self.merges.lock().clone()
    }
}

#[async_trait]
impl AudioToolkit for FakeToolkit {
    async fn probe_duration(&self, workdir: &Path, file_name: &str) -> Result<u64, String> {
        self.workdirs.lock().push(workdir.to_path_buf());
        self.probed.lock().push(file_name.to_string());

        if self.fail_probe_for.lock().as_deref() == Some(file_name) {
            return Err(format!("ffprobe exited with status 1 for {}", file_name));
        }

        let audio = tokio::fs::read(workdir.join(file_name))
            .await
            .map_err(|e| e.to_string())?;
        Ok(audio.len() as u64 * MILLIS_PER_BYTE)
    }

    async fn merge_sequential(
        &self,
        workdir: &Path,
        file_names: &[String],
        output_name: &str,
    ) -> Result<PathBuf, String> {
        self.merges.lock().push(file_names.to_vec());

        if self.fail_merge.load(Ordering::SeqCst) {
            return Err("ffmpeg exited with status 1".to_string());
        }

        let mut merged = Vec::new();
        for name in file_names {
            let audio = tokio::fs::read(workdir.join(name))
                .await
                .map_err(|e| e.to_string())?;
            merged.extend(audio);
        }

        let output = workdir.join(output_name);
        tokio::fs::write(&output, merged)
            .await
            .map_err(|e| e.to_string())?;
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Object storage
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeArtifactStore {
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    metadata: Mutex<Vec<(String, HashMap<String, String>)>>,
    fail_upload: AtomicBool,
    fail_metadata: AtomicBool,
}

impl FakeArtifactStore {
    pub fn fail_upload(&self) {
        self.fail_upload.store(true, Ordering::SeqCst);
    }

    pub fn fail_metadata(&self) {
        self.fail_metadata.store(true, Ordering::SeqCst);
    }

    /// Uploaded objects as `(container/key, bytes)`
    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().clone()
    }

    /// Metadata updates as `(container/key, metadata)`
    pub fn metadata(&self) -> Vec<(String, HashMap<String, String>)> {
        self.metadata.lock().clone()
    }
}

#[async_trait]
impl ArtifactStore for FakeArtifactStore {
    async fn upload(&self, container: &str, key: &str, path: &Path) -> Result<(), String> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err("bucket unreachable".to_string());
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
        self.uploads
            .lock()
            .push((format!("{}/{}", container, key), bytes));
        Ok(())
    }

    async fn set_metadata(
        &self,
        container: &str,
        key: &str,
        metadata: HashMap<String, String>,
    ) -> Result<(), String> {
        if self.fail_metadata.load(Ordering::SeqCst) {
            return Err("access denied".to_string());
        }

        self.metadata
            .lock()
            .push((format!("{}/{}", container, key), metadata));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeResultPublisher {
    results: Mutex<Vec<SpeechResult>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl FakeResultPublisher {
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Results the queue accepted
    pub fn results(&self) -> Vec<SpeechResult> {
        self.results.lock().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultPublisher for FakeResultPublisher {
    async fn publish(&self, result: &SpeechResult) -> Result<(), String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err("result queue unavailable".to_string());
        }
        self.results.lock().push(result.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeJobQueue {
    pending: Mutex<VecDeque<QueueMessage>>,
    receive_sizes: Mutex<Vec<usize>>,
    acknowledged: Mutex<Vec<String>>,
    fail_acknowledge: AtomicBool,
}

impl FakeJobQueue {
    pub fn push_messages(&self, messages: Vec<QueueMessage>) {
        self.pending.lock().extend(messages);
    }

    pub fn fail_acknowledge(&self) {
        self.fail_acknowledge.store(true, Ordering::SeqCst);
    }

    /// Receipt handles that were acknowledged
    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().clone()
    }

    /// Largest batch any receive call asked for
    pub fn largest_receive(&self) -> usize {
        self.receive_sizes.lock().iter().copied().max().unwrap_or(0)
    }
}

#[async_trait]
impl JobQueue for FakeJobQueue {
    async fn receive(&self, max_messages: usize) -> Result<Vec<QueueMessage>, String> {
        self.receive_sizes.lock().push(max_messages);

        let batch: Vec<QueueMessage> = {
            let mut pending = self.pending.lock();
            let take = max_messages.min(pending.len());
            pending.drain(..take).collect()
        };

        if batch.is_empty() {
            // Stand-in for the long poll
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Ok(batch)
    }

    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), String> {
        if self.fail_acknowledge.load(Ordering::SeqCst) {
            return Err("receipt handle expired".to_string());
        }
        self.acknowledged.lock().push(receipt_handle.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Job service
// ---------------------------------------------------------------------------

/// Job service that only records how many jobs overlap
pub struct SlowJobService {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    handled: AtomicUsize,
}

impl SlowJobService {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            handled: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn handled(&self) -> usize {
        self.handled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechJobServiceApi for SlowJobService {
    async fn handle(&self, request: RequestSpeech) -> Result<SpeechResult, SpeechJobError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.handled.fetch_add(1, Ordering::SeqCst);
        Ok(SpeechResult::success(&request, "jobsdata/slow".to_string(), vec![1]))
    }

    async fn reject(&self, job: JobIdentifiers, reason: String) -> Result<SpeechResult, SpeechJobError> {
        Ok(SpeechResult::rejected(&job, reason))
    }
}
