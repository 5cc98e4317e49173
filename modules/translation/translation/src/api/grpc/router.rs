//! gRPC router assembly: the translation service plus server reflection.

use std::sync::Arc;

use tonic::service::{RoutesBuilder, Routes};
use translation_sdk::{FILE_DESCRIPTOR_SET, TranslationServer};

use super::server::TranslationGrpcService;
use crate::api::Invoker;

/// # Errors
/// Returns an error if the embedded descriptor set cannot be loaded for reflection.
pub fn build_routes(invoker: Arc<Invoker>) -> anyhow::Result<Routes> {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let mut routes = RoutesBuilder::default();
    routes
        .add_service(TranslationServer::new(TranslationGrpcService::new(invoker)))
        .add_service(reflection);
    Ok(routes.routes())
}
