//! Domain layer for the translation module
//!
//! Contains the in-memory reference implementation of the use case.

pub mod service;

pub use service::InMemoryTranslation;
