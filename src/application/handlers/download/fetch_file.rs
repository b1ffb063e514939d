//! Redeem a token and open the purchased file.

use std::sync::Arc;

use crate::domain::download::DownloadTokenCodec;
use crate::ports::{BookFileStore, DownloadFile, FileStoreError};

use super::DownloadError;

/// Command to redeem a download token.
#[derive(Debug, Clone)]
pub struct FetchDownloadCommand {
    /// Identifier from the URL path.
    pub resource_id: String,

    /// Token from the query string.
    pub token: String,
}

/// Handler for token redemption and file opening.
///
/// The token is validated before any path resolution happens; an invalid
/// token never learns whether the resource exists.
pub struct FetchDownloadHandler {
    tokens: Arc<DownloadTokenCodec>,
    files: Arc<dyn BookFileStore>,
}

impl FetchDownloadHandler {
    /// Creates a new handler.
    pub fn new(tokens: Arc<DownloadTokenCodec>, files: Arc<dyn BookFileStore>) -> Self {
        Self { tokens, files }
    }

    /// Handles the command, returning an open file ready to stream.
    pub async fn handle(&self, cmd: FetchDownloadCommand) -> Result<DownloadFile, DownloadError> {
        self.tokens
            .redeem(&cmd.resource_id, &cmd.token)
            .map_err(DownloadError::TokenRejected)?;

        match self.files.open(&cmd.resource_id).await {
            Ok(download) => {
                tracing::info!(resource_id = %cmd.resource_id, "download authorized");
                Ok(download)
            }
            Err(FileStoreError::NotFound) => Err(DownloadError::NotFound(cmd.resource_id)),
            Err(FileStoreError::Io(message)) => Err(DownloadError::Storage(message)),
        }
    }
}
