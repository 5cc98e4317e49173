//! HTTP/REST adapter (axum).

pub mod docs;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod routes;

pub use router::build_router;
