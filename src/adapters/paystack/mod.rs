//! Paystack adapter - outbound gateway client.

mod client;

pub use client::{PaystackConfig, PaystackGatewayClient};
