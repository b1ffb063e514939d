//! Payment domain - gateway events, references, and webhook authenticity.

mod event;
mod reference;
mod webhook_verifier;

pub use event::{
    PaystackChargeData, PaystackCustomer, PaystackEvent, PaystackEventType, PaystackMetadata,
};
pub use reference::{PaymentReference, ReferenceError};
pub use webhook_verifier::{PaystackWebhookVerifier, WebhookError};

#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
