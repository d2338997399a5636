use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, ViewerError};
use crate::host::{FileHandle, ImageBytes};

/// A file on the local filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsFileHandle {
    path: PathBuf,
    name: String,
    full_path: String,
}

impl FsFileHandle {
    /// Handle for `path`, with `full_path` rendered relative to the parent of
    /// the dropped `root` (`/<root name>/sub/file.png`).
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = root.parent().unwrap_or(root);
        let relative = path.strip_prefix(base).unwrap_or(&path);
        let full_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .filter(|c| c != "/")
            .fold(String::new(), |mut acc, c| {
                acc.push('/');
                acc.push_str(&c);
                acc
            });
        Self {
            path,
            name,
            full_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for FsFileHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    async fn read_bytes(&self) -> Result<ImageBytes> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ViewerError::Read {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.into())
    }
}

/// Recursively list every regular file under `roots`.
///
/// A root may be a file or a directory. Unreadable entries are logged and
/// skipped; they never abort the scan. Results are sorted by file name within
/// each directory.
pub fn scan_files<P: AsRef<Path>>(roots: &[P]) -> Vec<FsFileHandle> {
    let mut files = Vec::new();
    for root in roots {
        let root = root.as_ref();
        for entry in WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    files.push(FsFileHandle::new(root, entry.into_path()));
                }
                Ok(_) => {}
                Err(e) => warn!(root = %root.display(), error = %e, "Skipping unreadable entry"),
            }
        }
    }
    debug!(roots = roots.len(), files = files.len(), "Scan complete");
    files
}
