//! Download configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Download configuration (signed file delivery)
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Secret key used to sign download capability tokens
    pub secret_key: String,

    /// Directory holding purchasable book files, outside any public root
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Default token lifetime when a request does not specify one, in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Redemption attempts allowed per client address per window
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,

    /// Redemption rate limit window, in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u32,
}

impl DownloadConfig {
    /// Validate download configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("DOWNLOAD_SECRET_KEY"));
        }
        if self.default_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.rate_limit_max == 0 || self.rate_limit_window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            storage_dir: default_storage_dir(),
            default_ttl_secs: default_token_ttl_secs(),
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
        }
    }
}

fn default_storage_dir() -> String {
    "./private_downloads".to_string()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_rate_limit_max() -> u32 {
    5
}

fn default_rate_limit_window_secs() -> u32 {
    60
}
