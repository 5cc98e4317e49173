//! Transport adapters.
//!
//! Every adapter decodes its protocol payload, then goes through the shared
//! [`Invoker`] (validation, cancellation, deadline, panic recovery) and maps
//! the outcome back with its own error mapping. Adapters never call each other.

pub mod amqp_rpc;
pub mod dto;
pub mod error;
pub mod grpc;
pub mod invoker;
pub mod rest;

pub use error::{AdapterError, Operation};
pub use invoker::Invoker;

/// Header (HTTP) and metadata key (gRPC) carrying the requester identity.
pub const REQUESTER_HEADER: &str = "x-requester-id";

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
