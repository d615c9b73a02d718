use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WORKSPACE_PREFIX: &str = "speech-";

/// Job-scoped scratch directory for segment files and the merged output.
///
/// Released explicitly with [`Workspace::cleanup`]; if the owning task unwinds
/// first, dropping the workspace removes the directory instead.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh, uniquely named directory under `root`
    pub fn create(root: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Remove the directory and everything in it. A directory that is already
    /// gone counts as cleaned up.
    pub fn cleanup(self) -> io::Result<()> {
        match self.dir.close() {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
