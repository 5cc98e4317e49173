//! `OpenAPI` document and Swagger UI.

use std::sync::Arc;

use axum::Router;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use utoipa::OpenApi;

use super::handlers;
use crate::api::dto::{
    ErrorResponse, TranslationRecordDto, TranslationRequestDto, TranslationResultDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Translation API",
        description = "Translation history and on-demand translation",
        version = "1.0"
    ),
    paths(handlers::history, handlers::do_translate),
    components(schemas(
        TranslationRequestDto,
        TranslationResultDto,
        TranslationRecordDto,
        ErrorResponse
    )),
    tags((name = "translation", description = "Translation use case"))
)]
pub struct ApiDoc;

const SWAGGER_UI: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Translation API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/swagger/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// Routes serving the document and the UI under `/swagger`.
#[must_use]
pub fn router() -> Router {
    // Build once, serve as static JSON
    let doc = Arc::new(ApiDoc::openapi());
    let ui = || async { Html(SWAGGER_UI) };

    Router::new()
        .route(
            "/swagger/openapi.json",
            get(move || async move {
                (
                    [(header::CACHE_CONTROL, "no-store")],
                    axum::Json(doc.as_ref()),
                )
                    .into_response()
            }),
        )
        .route("/swagger", get(ui))
        .route("/swagger/", get(ui))
        .route("/swagger/index.html", get(ui))
}
