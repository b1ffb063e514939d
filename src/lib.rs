//! Bindery - Payment and Secure Download Backend
//!
//! This crate implements the payment verification and signed-download flow
//! for the Bindery book storefront: Paystack webhook authentication,
//! capability tokens for purchased files, and failed-payment monitoring.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
