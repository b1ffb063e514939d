//! Download domain - signed capability tokens for purchased files.

mod token;

pub use token::{DownloadTokenCodec, IssuedToken, TokenRejection};
