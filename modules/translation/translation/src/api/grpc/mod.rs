//! gRPC adapter (tonic).

pub mod error;
pub mod router;
pub mod server;

pub use router::build_routes;
pub use server::TranslationGrpcService;
