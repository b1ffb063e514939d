//! Local filesystem store for purchasable book files.
//!
//! Files live in a single directory outside any public root. Lookups are
//! basename-only: directory components in the caller-supplied identifier
//! are stripped before the path is built, so a traversal attempt like
//! `../../etc/passwd` resolves inside the storage root and misses.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{BookFileStore, DownloadFile, FileStoreError};

/// Book file store rooted at a single local directory.
#[derive(Debug, Clone)]
pub struct LocalBookFileStore {
    /// Directory holding all downloadable files.
    root: PathBuf,
}

impl LocalBookFileStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves an identifier to a path inside the root, basename-only.
    ///
    /// Returns `None` when the identifier has no usable file name
    /// (empty, `.`, `..`, or a bare directory path).
    fn resolve(&self, file_id: &str) -> Option<PathBuf> {
        let name = Path::new(file_id).file_name()?;
        Some(self.root.join(name))
    }
}

#[async_trait]
impl BookFileStore for LocalBookFileStore {
    async fn exists(&self, file_id: &str) -> Result<bool, FileStoreError> {
        let Some(path) = self.resolve(file_id) else {
            return Ok(false);
        };

        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStoreError::Io(format!(
                "failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn open(&self, file_id: &str) -> Result<DownloadFile, FileStoreError> {
        let path = self.resolve(file_id).ok_or(FileStoreError::NotFound)?;

        let meta = fs::metadata(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileStoreError::NotFound,
            _ => FileStoreError::Io(format!("failed to stat {}: {}", path.display(), e)),
        })?;

        if !meta.is_file() {
            return Err(FileStoreError::NotFound);
        }

        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileStoreError::NotFound,
            _ => FileStoreError::Io(format!("failed to open {}: {}", path.display(), e)),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_id.to_string());

        Ok(DownloadFile {
            file,
            file_name,
            size_bytes: meta.len(),
        })
    }
}
