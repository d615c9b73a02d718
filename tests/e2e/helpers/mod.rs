use speech_worker::controllers::speech::SpeechController;
use speech_worker::domain::speech::SpeechJobService;
use speech_worker::domain::voice::VoiceService;
use speech_worker::infrastructure::http::build_router;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;

pub mod api_client;
pub mod fakes;

use api_client::TestClient;
use fakes::{FakeArtifactStore, FakeResultPublisher, FakeToolkit, FakeTts, FakeVoiceCatalog};

pub const ARTIFACT_CONTAINER: &str = "jobsdata";

pub struct TestContext {
    pub tts: Arc<FakeTts>,
    pub catalog: Arc<FakeVoiceCatalog>,
    pub toolkit: Arc<FakeToolkit>,
    pub store: Arc<FakeArtifactStore>,
    pub results: Arc<FakeResultPublisher>,
    pub service: Arc<SpeechJobService>,
    pub client: TestClient,
    pub workspace_root: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let workspace_root = tempfile::tempdir().expect("Failed to create workspace root");

            let tts = Arc::new(FakeTts::default());
            let catalog = Arc::new(FakeVoiceCatalog::new(fixtures::default_voices()));
            let toolkit = Arc::new(FakeToolkit::default());
            let store = Arc::new(FakeArtifactStore::default());
            let results = Arc::new(FakeResultPublisher::default());

            let voice_service = Arc::new(VoiceService::new(catalog.clone()));
            let service = Arc::new(SpeechJobService::new(
                voice_service.clone(),
                tts.clone(),
                toolkit.clone(),
                store.clone(),
                ARTIFACT_CONTAINER.to_string(),
                results.clone(),
                workspace_root.path().to_path_buf(),
            ));

            let speech_controller = Arc::new(SpeechController::new(voice_service));
            let client = TestClient::new(build_router(speech_controller));

            Self {
                tts,
                catalog,
                toolkit,
                store,
                results,
                service,
                client,
                workspace_root,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Workspace root is removed when the TempDir drops
        }
    }
}

impl TestContext {
    /// Job directories still present under the workspace root
    pub fn leftover_workspaces(&self) -> usize {
        count_entries(self.workspace_root.path())
    }
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read workspace root")
        .count()
}
