use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use crate::api::Invoker;

/// Mount the v1 translation routes on `router`.
#[must_use]
pub fn register_routes(router: Router, invoker: Arc<Invoker>) -> Router {
    let translation = Router::new()
        .route("/history", get(handlers::history))
        .route("/do-translate", post(handlers::do_translate));

    router.nest(
        "/v1",
        Router::new()
            .nest("/translation", translation)
            .layer(Extension(invoker)),
    )
}
