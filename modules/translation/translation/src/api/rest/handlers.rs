use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use tracing::field::Empty;

use crate::api::dto::{
    ErrorResponse, TranslationRecordDto, TranslationRequestDto, TranslationResultDto,
};
use crate::api::{AdapterError, Invoker, REQUESTER_HEADER};

fn requester(headers: &HeaderMap) -> Option<&str> {
    headers.get(REQUESTER_HEADER).and_then(|v| v.to_str().ok())
}

/// Show translation history
#[utoipa::path(
    get,
    path = "/v1/translation/history",
    tag = "translation",
    operation_id = "history",
    params(("x-requester-id" = Option<String>, Header, description = "Requester identity")),
    responses(
        (status = 200, description = "Translation history", body = [TranslationRecordDto]),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(requester = Empty))]
pub async fn history(
    Extension(invoker): Extension<Arc<Invoker>>,
    headers: HeaderMap,
) -> Result<Json<Vec<TranslationRecordDto>>, AdapterError> {
    let ctx = invoker.context(requester(&headers));
    tracing::Span::current().record("requester", ctx.requester());

    let history = invoker.get_history(&ctx).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}

/// Translate a text
#[utoipa::path(
    post,
    path = "/v1/translation/do-translate",
    tag = "translation",
    operation_id = "do-translate",
    params(("x-requester-id" = Option<String>, Header, description = "Requester identity")),
    request_body = TranslationRequestDto,
    responses(
        (status = 200, description = "Translated text", body = TranslationResultDto),
        (status = 400, description = "Malformed or invalid request", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(requester = Empty))]
pub async fn do_translate(
    Extension(invoker): Extension<Arc<Invoker>>,
    headers: HeaderMap,
    body: Result<Json<TranslationRequestDto>, JsonRejection>,
) -> Result<Json<TranslationResultDto>, AdapterError> {
    let Json(req) = body.map_err(|e| AdapterError::Decode(e.body_text()))?;
    let ctx = invoker.context(requester(&headers));
    tracing::Span::current().record("requester", ctx.requester());

    let result = invoker.do_translate(&ctx, req.into()).await?;
    Ok(Json(result.into()))
}
