pub mod ffmpeg;

pub use ffmpeg::FfmpegToolkit;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// External audio tooling used by the speech pipeline.
///
/// File names are relative to `workdir`; implementations run with `workdir`
/// as their working directory.
#[async_trait]
pub trait AudioToolkit: Send + Sync {
    /// Playback duration of `file_name`, rounded to the nearest millisecond
    async fn probe_duration(&self, workdir: &Path, file_name: &str) -> Result<u64, String>;

    /// Concatenate `file_names` in order into `output_name` without re-encoding.
    /// Returns the full path of the merged file.
    async fn merge_sequential(
        &self,
        workdir: &Path,
        file_names: &[String],
        output_name: &str,
    ) -> Result<PathBuf, String>;
}
