//! Download command handlers.

mod fetch_file;
mod generate_link;

pub use fetch_file::{FetchDownloadCommand, FetchDownloadHandler};
pub use generate_link::{
    GenerateDownloadLinkCommand, GenerateDownloadLinkHandler, IssuedDownloadLink,
};

use thiserror::Error;

use crate::domain::download::TokenRejection;

/// Errors from the download flow.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// No stored file matches the identifier.
    #[error("unknown resource: {0}")]
    NotFound(String),

    /// The presented capability token was refused.
    #[error("download token rejected: {0}")]
    TokenRejected(TokenRejection),

    /// Underlying storage failure.
    #[error("storage failure: {0}")]
    Storage(String),
}
