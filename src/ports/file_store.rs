//! Purchased file storage port.

use async_trait::async_trait;
use thiserror::Error;

/// Port for looking up and opening purchasable book files.
///
/// Implementations must confine lookups to their storage root regardless of
/// what the caller-supplied identifier contains.
#[async_trait]
pub trait BookFileStore: Send + Sync {
    /// Whether a file for this identifier exists in the store.
    async fn exists(&self, file_id: &str) -> Result<bool, FileStoreError>;

    /// Open a file for streaming.
    async fn open(&self, file_id: &str) -> Result<DownloadFile, FileStoreError>;
}

/// An opened file ready to stream to a client.
#[derive(Debug)]
pub struct DownloadFile {
    /// Open handle; dropped (and thereby released) when streaming ends,
    /// whether it completed or failed.
    pub file: tokio::fs::File,

    /// Bare file name for the Content-Disposition header.
    pub file_name: String,

    /// File size in bytes.
    pub size_bytes: u64,
}

/// Errors from file store operations.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// No file exists for the identifier.
    #[error("file not found")]
    NotFound,

    /// Underlying filesystem failure.
    #[error("storage error: {0}")]
    Io(String),
}
