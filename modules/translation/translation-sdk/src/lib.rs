#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Translation SDK
//!
//! This crate provides everything needed to consume or implement the
//! translation use case:
//! - Use-case trait (`TranslationClient`)
//! - Models (`TranslationRequest`, `TranslationResult`, `TranslationRecord`)
//! - Error type (`TranslationError`)
//! - Per-call context (`RequestContext`) carrying requester identity,
//!   cancellation and deadline
//! - Proto stubs for the gRPC server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use translation_sdk::{RequestContext, TranslationClient, TranslationRequest};
//!
//! let ctx = RequestContext::new("alice");
//! let result = client
//!     .do_translate(&ctx, TranslationRequest::new("hello", "en", "vi"))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === USE-CASE TRAIT AND TYPES ===
mod api;
mod context;
mod error;
mod models;

pub use api::TranslationClient;
pub use context::{Interrupted, RequestContext};
pub use error::TranslationError;
pub use models::{TranslationRecord, TranslationRequest, TranslationResult};

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for the `translation.v1.Translation` service
#[allow(clippy::pedantic, clippy::derive_partial_eq_without_eq)]
pub mod proto {
    tonic::include_proto!("translation.v1");
}

// Re-export proto types needed by the server
pub use proto::translation_server::{Translation as TranslationGrpc, TranslationServer};

/// Fully qualified gRPC service name
pub const SERVICE_NAME: &str = "translation.v1.Translation";

/// Encoded file descriptor set of the translation protos, used for server reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("translation_descriptor");
