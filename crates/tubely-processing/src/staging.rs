//! Per-request staging on the local filesystem.
//!
//! Each request gets its own uniquely named directory. Every artifact of the request
//! (the uploaded original and anything derived from it) lives inside that directory, and
//! dropping the [`StagingArea`] removes the directory with all of its contents.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::ProcessingResult;

const STAGING_PREFIX: &str = "tubely-upload-";

pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh staging directory under `root`, creating `root` if needed.
    pub fn new_in(root: &Path) -> ProcessingResult<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(root)?;
        tracing::debug!(path = %dir.path().display(), "Created staging directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a new file named `name` inside the staging directory for writing.
    pub async fn create_file(&self, name: &str) -> ProcessingResult<StagingWriter> {
        let path = self.dir.path().join(name);
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok(StagingWriter {
            file,
            path,
            written: 0,
        })
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        tracing::debug!(path = %self.dir.path().display(), "Removing staging directory");
    }
}

/// Incremental writer for a staged file.
pub struct StagingWriter {
    file: File,
    path: PathBuf,
    written: u64,
}

impl StagingWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> ProcessingResult<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush and sync to disk, then close the handle. Readers open the file by path.
    pub async fn finish(mut self) -> ProcessingResult<StagedFile> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(StagedFile {
            path: self.path,
            size: self.written,
        })
    }
}

/// A fully written, closed staged file.
///
/// The file itself is removed together with its [`StagingArea`].
pub struct StagedFile {
    path: PathBuf,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
