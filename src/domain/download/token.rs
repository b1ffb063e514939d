//! Signed, expiring download tokens.
//!
//! A token is a bearer capability for one downloadable file. The wire format
//! is `base64url(expires_at_ms ":" hex(HMAC-SHA256(secret, "{file_id}:{expires_at_ms}")))`.
//! The file id is never embedded in the token; redemption re-supplies it and
//! the signature binds the two together.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Why a presented token was refused.
///
/// Every failure mode collapses to a 403 at the HTTP boundary; the variants
/// exist for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// Not decodable as base64url, or missing the expiry/signature fields.
    #[error("malformed token")]
    Malformed,

    /// Structurally valid but past its expiry instant.
    #[error("token expired")]
    Expired,

    /// Signature does not match the supplied file id and expiry.
    #[error("token signature mismatch")]
    BadSignature,
}

/// A freshly issued token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Opaque token string for the download URL query parameter.
    pub token: String,

    /// Absolute expiry, Unix milliseconds.
    pub expires_at_ms: i64,
}

/// Issues and redeems signed download tokens.
pub struct DownloadTokenCodec {
    /// Shared signing secret, distinct from the webhook secret.
    secret: SecretString,
}

impl DownloadTokenCodec {
    /// Creates a codec signing with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Issues a token for `file_id` valid for `ttl_secs` from now.
    pub fn issue(&self, file_id: &str, ttl_secs: u64) -> IssuedToken {
        let expires_at_ms = chrono::Utc::now().timestamp_millis() + (ttl_secs as i64) * 1000;
        self.issue_with_expiry(file_id, expires_at_ms)
    }

    /// Validates `token` against `file_id`.
    ///
    /// A token is valid iff it decodes, its expiry has not passed, and its
    /// signature matches the recomputation for the supplied file id. Never
    /// panics on attacker-controlled input.
    pub fn redeem(&self, file_id: &str, token: &str) -> Result<(), TokenRejection> {
        let decoded = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenRejection::Malformed)?;
        let decoded = String::from_utf8(decoded).map_err(|_| TokenRejection::Malformed)?;

        let (expiry_str, signature) = decoded
            .split_once(':')
            .ok_or(TokenRejection::Malformed)?;
        let expires_at_ms: i64 = expiry_str.parse().map_err(|_| TokenRejection::Malformed)?;
        if signature.is_empty() {
            return Err(TokenRejection::Malformed);
        }

        if chrono::Utc::now().timestamp_millis() > expires_at_ms {
            return Err(TokenRejection::Expired);
        }

        let expected = self.sign(file_id, expires_at_ms);
        if !constant_time_compare(signature.as_bytes(), expected.as_bytes()) {
            return Err(TokenRejection::BadSignature);
        }

        Ok(())
    }

    fn issue_with_expiry(&self, file_id: &str, expires_at_ms: i64) -> IssuedToken {
        let signature = self.sign(file_id, expires_at_ms);
        let token = URL_SAFE_NO_PAD.encode(format!("{}:{}", expires_at_ms, signature));
        IssuedToken {
            token,
            expires_at_ms,
        }
    }

    /// Computes the hex HMAC-SHA256 over `"{file_id}:{expires_at_ms}"`.
    fn sign(&self, file_id: &str, expires_at_ms: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(format!("{}:{}", file_id, expires_at_ms).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// Guards the length first so unequal-length inputs fail closed without
/// reaching the fixed-time comparison.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
