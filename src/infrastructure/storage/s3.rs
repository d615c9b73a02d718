use super::ArtifactStore;
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, types::MetadataDirective, Client as S3Client};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// S3 implementation of the artifact store. The container is the bucket name.
pub struct S3ArtifactStore {
    s3_client: Arc<S3Client>,
}

impl S3ArtifactStore {
    pub fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }

    /// URL-encoded `bucket/key` as required by CopyObject
    fn copy_source(bucket: &str, key: &str) -> String {
        urlencoding::encode(&format!("{}/{}", bucket, key)).into_owned()
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn upload(&self, container: &str, key: &str, path: &Path) -> Result<(), String> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        self.s3_client
            .put_object()
            .bucket(container)
            .key(key)
            .content_type(AUDIO_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket = container, key = key, "S3 put_object failed");
                format!("S3 upload failed: {}", e)
            })?;

        Ok(())
    }

    async fn set_metadata(
        &self,
        container: &str,
        key: &str,
        metadata: HashMap<String, String>,
    ) -> Result<(), String> {
        // S3 metadata is immutable, so the object is copied onto itself with new metadata
        self.s3_client
            .copy_object()
            .bucket(container)
            .key(key)
            .copy_source(Self::copy_source(container, key))
            .metadata_directive(MetadataDirective::Replace)
            .content_type(AUDIO_CONTENT_TYPE)
            .set_metadata(Some(metadata))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket = container, key = key, "S3 copy_object failed");
                format!("S3 metadata update failed: {}", e)
            })?;

        Ok(())
    }
}
