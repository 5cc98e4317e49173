//! Request metrics for the HTTP adapter, mounted when `http.metrics_enabled` is set.
//!
//! The metric prefix of `prometheus_axum_middleware` is global to the process,
//! so the first router built with metrics decides it. Routers built later with
//! another prefix keep the first one and log a warning.

use std::sync::OnceLock;

use axum::Router;
use axum::routing::get;
use prometheus_axum_middleware::PrometheusAxumLayer;

static INSTALLED_PREFIX: OnceLock<String> = OnceLock::new();

/// Install `prefix` unless one is already installed. Returns the prefix in effect.
fn install_prefix(prefix: &str) -> &'static str {
    let installed = INSTALLED_PREFIX.get_or_init(|| {
        prometheus_axum_middleware::set_prefix(prefix);
        tracing::info!(prefix, "prometheus metrics initialized");
        prefix.to_owned()
    });
    if installed != prefix {
        tracing::warn!(
            requested = prefix,
            installed = %installed,
            "metrics prefix already installed, keeping the first one"
        );
    }
    installed
}

/// Serve `GET /metrics` and count every request handled by `router`,
/// including the ones to `/metrics` itself.
#[must_use]
pub fn with_metrics(router: Router, prefix: &str) -> Router {
    install_prefix(prefix);
    router
        .route("/metrics", get(prometheus_axum_middleware::render))
        .layer(PrometheusAxumLayer::new())
}
