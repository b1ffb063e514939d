//! Paystack webhook signature verification.
//!
//! Paystack signs each delivery with HMAC-SHA512 over the raw request body,
//! hex-encoded in the `X-Paystack-Signature` header. Verification must run
//! against the exact bytes received on the wire; re-serializing the parsed
//! JSON produces a different byte sequence and silently breaks the check.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::event::PaystackEvent;

type HmacSha512 = Hmac<Sha512>;

/// Errors from webhook verification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature did not match the payload.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Authenticated payload could not be parsed as an event envelope.
    #[error("malformed webhook payload: {0}")]
    ParseError(String),
}

/// Verifier for Paystack webhook signatures.
pub struct PaystackWebhookVerifier {
    /// The Paystack secret key; doubles as the webhook signing secret.
    secret: SecretString,
}

impl PaystackWebhookVerifier {
    /// Creates a new verifier with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Checks the signature over the raw payload bytes.
    pub fn verify(&self, payload: &[u8], signature_hex: &str) -> bool {
        let expected = self.compute_signature(payload);
        constant_time_compare(expected.as_bytes(), signature_hex.as_bytes())
    }

    /// Verifies the signature and parses the event envelope.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature verification failed
    /// - `ParseError` - payload is not a valid event envelope
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_hex: &str,
    ) -> Result<PaystackEvent, WebhookError> {
        if !self.verify(payload, signature_hex) {
            return Err(WebhookError::InvalidSignature);
        }

        let event: PaystackEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        Ok(event)
    }

    /// Computes the hex HMAC-SHA512 of the payload.
    fn compute_signature(&self, payload: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak how much of the expected
/// signature an attacker has guessed.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex HMAC-SHA512 signature for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaystackEventType;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "sk_test_webhook_secret_12345";

    fn verifier() -> PaystackWebhookVerifier {
        PaystackWebhookVerifier::new(TEST_SECRET)
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let payload = br#"{"event":"charge.success","data":{}}"#;
        let signature = compute_test_signature(TEST_SECRET, payload);

        assert!(verifier().verify(payload, &signature));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let payload = br#"{"event":"charge.success","data":{}}"#;
        let signature = compute_test_signature("sk_test_other_secret", payload);

        assert!(!verifier().verify(payload, &signature));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let original = br#"{"event":"charge.success","data":{"amount":5000}}"#;
        let signature = compute_test_signature(TEST_SECRET, original);

        // Single byte flipped: amount 5000 -> 5001
        let tampered = br#"{"event":"charge.success","data":{"amount":5001}}"#;

        assert!(!verifier().verify(tampered, &signature));
    }

    #[test]
    fn verify_rejects_signature_of_reserialized_body() {
        // The same JSON with different whitespace is a different byte
        // sequence; its signature must not transfer.
        let wire = br#"{"event":"charge.success","data":{}}"#;
        let reserialized = br#"{ "event": "charge.success", "data": {} }"#;
        let signature = compute_test_signature(TEST_SECRET, reserialized);

        assert!(!verifier().verify(wire, &signature));
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let payload = br#"{"event":"charge.success","data":{}}"#;
        let signature = compute_test_signature(TEST_SECRET, payload);

        assert!(!verifier().verify(payload, &signature[..64]));
    }

    #[test]
    fn verify_rejects_empty_signature() {
        let payload = br#"{"event":"charge.success","data":{}}"#;
        assert!(!verifier().verify(payload, ""));
    }

    #[test]
    fn verify_rejects_non_hex_signature() {
        let payload = br#"{"event":"charge.success","data":{}}"#;
        // Well-formed length, invalid characters
        let bogus = "z".repeat(128);
        assert!(!verifier().verify(payload, &bogus));
    }

    // ══════════════════════════════════════════════════════════════
    // Verify and Parse
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_and_parse_returns_event() {
        let payload = br#"{"event":"charge.success","data":{"reference":"BINDref123"}}"#;
        let signature = compute_test_signature(TEST_SECRET, payload);

        let event = verifier().verify_and_parse(payload, &signature).unwrap();

        assert_eq!(event.parsed_type(), PaystackEventType::ChargeSuccess);
    }

    #[test]
    fn verify_and_parse_rejects_bad_signature_before_parsing() {
        let payload = b"not even json";
        let result = verifier().verify_and_parse(payload, "00");

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_and_parse_rejects_signed_non_json() {
        let payload = b"not even json";
        let signature = compute_test_signature(TEST_SECRET, payload);

        let result = verifier().verify_and_parse(payload, &signature);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn signature_is_lowercase_hex_of_expected_length() {
        let signature = verifier().compute_signature(b"payload");
        // SHA-512 digest is 64 bytes, 128 hex characters
        assert_eq!(signature.len(), 128);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(signature, signature.to_lowercase());
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(b"aabbcc", b"aabbcc"));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(b"aabb", b"aabbcc"));
    }

    // ══════════════════════════════════════════════════════════════
    // Property Tests
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn any_single_byte_flip_breaks_verification(
            payload in proptest::collection::vec(any::<u8>(), 1..256),
            position in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let verifier = PaystackWebhookVerifier::new(TEST_SECRET);
            let signature = compute_test_signature(TEST_SECRET, &payload);

            let mut tampered = payload.clone();
            let index = position.index(tampered.len());
            tampered[index] ^= flip;

            prop_assert!(verifier.verify(&payload, &signature));
            prop_assert!(!verifier.verify(&tampered, &signature));
        }

        #[test]
        fn prefix_matching_signatures_are_rejected(prefix_len in 0usize..128) {
            // A guess sharing any number of leading characters with the real
            // signature must fail just the same.
            let verifier = PaystackWebhookVerifier::new(TEST_SECRET);
            let payload = b"{\"event\":\"charge.success\"}";
            let real = compute_test_signature(TEST_SECRET, payload);

            let mut guess: Vec<u8> = real.clone().into_bytes();
            guess[prefix_len] = if guess[prefix_len] == b'f' { b'0' } else { b'f' };
            let guess = String::from_utf8(guess).unwrap();
            prop_assume!(guess != real);

            prop_assert!(!verifier.verify(payload, &guess));
        }
    }
}
