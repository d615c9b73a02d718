pub mod s3;

pub use s3::S3ArtifactStore;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Durable object storage for merged speech artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the file at `path` to `container/key`
    async fn upload(&self, container: &str, key: &str, path: &Path) -> Result<(), String>;

    /// Attach metadata to an already uploaded object, replacing existing metadata
    async fn set_metadata(
        &self,
        container: &str,
        key: &str,
        metadata: HashMap<String, String>,
    ) -> Result<(), String>;
}
