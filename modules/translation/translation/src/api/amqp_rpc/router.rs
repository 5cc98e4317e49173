//! RPC router assembly.

use std::sync::Arc;

use super::handlers;
use super::routes::{RouteError, RpcRoutes, RpcRoutesBuilder};
use crate::api::Invoker;

/// Build the routing table with every supported RPC method.
///
/// # Errors
/// Returns [`RouteError::Duplicate`] if two handlers claim the same method.
pub fn build_routes(invoker: &Arc<Invoker>) -> Result<RpcRoutes, RouteError> {
    let mut builder = RpcRoutesBuilder::new();
    handlers::register_v1(&mut builder, invoker)?;
    Ok(builder.build())
}
