//! HTTP router assembly.

use std::any::Any;
use std::sync::Arc;

use axum::{Json, Router};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use super::{docs, metrics, routes};
use crate::api::dto::ErrorResponse;
use crate::api::{Invoker, panic_message};
use crate::config::HttpConfig;

/// Build the complete HTTP router.
///
/// Always mounts `/healthz` and the v1 routes. `/metrics` and `/swagger` are
/// mounted when enabled in `cfg`. Every request goes through panic recovery
/// and is logged once with method, path, status and latency.
#[must_use]
pub fn build_router(cfg: &HttpConfig, invoker: Arc<Invoker>) -> Router {
    let mut router = Router::new();

    if cfg.swagger_enabled {
        router = router.merge(docs::router());
    }

    router = router.route("/healthz", get(|| async { StatusCode::OK }));
    router = routes::register_routes(router, invoker);

    if cfg.metrics_enabled {
        router = metrics::with_metrics(router, &cfg.metrics_prefix);
    }
    apply_middleware(router)
}

/// Panic recovery (inner) and request logging (outer).
#[must_use]
pub(crate) fn apply_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(recover))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_request(())
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let ms = latency.as_millis();
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", ms);
                        tracing::info!(status = res.status().as_u16(), latency_ms = ms, "request served");
                    },
                ),
        )
}

#[allow(clippy::needless_pass_by_value)] // signature required by CatchPanicLayer
fn recover(payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = %panic_message(payload.as_ref()), "recovered from panic in handler");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("internal server error")),
    )
        .into_response()
}
