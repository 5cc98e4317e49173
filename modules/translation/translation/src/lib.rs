#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Translation module.
//!
//! Exposes one translation use case over HTTP/REST, gRPC and AMQP-RPC. All
//! three adapters share the same validator and the same call pipeline, so an
//! input is accepted or rejected identically whatever the transport.

pub mod api;
pub mod config;
pub mod domain;
pub mod module;
pub mod validation;

pub use config::{GrpcConfig, HttpConfig, RpcConfig, TranslationConfig};
pub use domain::InMemoryTranslation;
pub use module::TranslationModule;
pub use validation::{Validate, ValidationError, Validator};

/// Name of the module's configuration section.
pub const MODULE_NAME: &str = "translation";
