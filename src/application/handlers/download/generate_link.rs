//! Generate a short-lived signed download link.

use std::sync::Arc;

use crate::domain::download::DownloadTokenCodec;
use crate::ports::{BookFileStore, FileStoreError};

use super::DownloadError;

/// Command to create a signed download URL for a stored file.
#[derive(Debug, Clone)]
pub struct GenerateDownloadLinkCommand {
    /// Identifier of the file to authorize.
    pub resource_id: String,

    /// Token lifetime; falls back to the configured default when absent.
    pub ttl_secs: Option<u64>,
}

/// A signed link ready to hand to a purchaser.
#[derive(Debug, Clone)]
pub struct IssuedDownloadLink {
    /// Relative redemption URL including the token.
    pub url: String,

    /// Absolute expiry, Unix milliseconds.
    pub expires_at_ms: i64,

    /// The bare token, for callers that build their own URL.
    pub token: String,
}

/// Handler for download link generation.
///
/// Capabilities are never issued for nonexistent resources; the store is
/// consulted before the token is signed.
pub struct GenerateDownloadLinkHandler {
    tokens: Arc<DownloadTokenCodec>,
    files: Arc<dyn BookFileStore>,
    default_ttl_secs: u64,
}

impl GenerateDownloadLinkHandler {
    /// Creates a new handler.
    pub fn new(
        tokens: Arc<DownloadTokenCodec>,
        files: Arc<dyn BookFileStore>,
        default_ttl_secs: u64,
    ) -> Self {
        Self {
            tokens,
            files,
            default_ttl_secs,
        }
    }

    /// Handles the command.
    pub async fn handle(
        &self,
        cmd: GenerateDownloadLinkCommand,
    ) -> Result<IssuedDownloadLink, DownloadError> {
        let exists = self
            .files
            .exists(&cmd.resource_id)
            .await
            .map_err(|e| match e {
                FileStoreError::NotFound => DownloadError::NotFound(cmd.resource_id.clone()),
                FileStoreError::Io(message) => DownloadError::Storage(message),
            })?;
        if !exists {
            return Err(DownloadError::NotFound(cmd.resource_id));
        }

        let ttl_secs = cmd.ttl_secs.unwrap_or(self.default_ttl_secs);
        let issued = self.tokens.issue(&cmd.resource_id, ttl_secs);

        tracing::info!(
            resource_id = %cmd.resource_id,
            expires_at_ms = issued.expires_at_ms,
            "download link issued"
        );

        Ok(IssuedDownloadLink {
            url: format!("/download/{}?token={}", cmd.resource_id, issued.token),
            expires_at_ms: issued.expires_at_ms,
            token: issued.token,
        })
    }
}
