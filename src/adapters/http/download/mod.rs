//! HTTP adapter for download endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::download_routes;
