//! v1 RPC handlers. Bodies use the same JSON as the REST adapter.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use super::error::RpcError;
use super::routes::{CallFuture, CallHandler, RouteError, RpcCall, RpcRoutesBuilder};
use crate::api::dto::{TranslationRecordDto, TranslationRequestDto, TranslationResultDto};
use crate::api::{AdapterError, Invoker};

pub const GET_HISTORY: &str = "v1.getHistory";
pub const DO_TRANSLATE: &str = "v1.doTranslate";

/// Register the v1 methods.
///
/// # Errors
/// Returns [`RouteError::Duplicate`] if a v1 method is already registered.
pub fn register_v1(builder: &mut RpcRoutesBuilder, invoker: &Arc<Invoker>) -> Result<(), RouteError> {
    builder
        .register(GET_HISTORY, get_history(Arc::clone(invoker)))?
        .register(DO_TRANSLATE, do_translate(Arc::clone(invoker)))?;
    Ok(())
}

/// `v1.getHistory`: body is ignored, replies with a JSON array of records.
#[must_use]
pub fn get_history(invoker: Arc<Invoker>) -> CallHandler {
    Arc::new(move |call: RpcCall| -> CallFuture {
        let invoker = Arc::clone(&invoker);
        Box::pin(async move {
            let ctx = invoker.context(call.requester.as_deref());
            let history = invoker.get_history(&ctx).await?;
            let history: Vec<TranslationRecordDto> = history.into_iter().map(Into::into).collect();
            encode(&history)
        })
    })
}

/// `v1.doTranslate`: body is a translation request, replies with the result.
#[must_use]
pub fn do_translate(invoker: Arc<Invoker>) -> CallHandler {
    Arc::new(move |call: RpcCall| -> CallFuture {
        let invoker = Arc::clone(&invoker);
        Box::pin(async move {
            let req: TranslationRequestDto = serde_json::from_slice(&call.body)
                .map_err(|e| AdapterError::Decode(e.to_string()))?;
            let ctx = invoker.context(call.requester.as_deref());
            let result = invoker.do_translate(&ctx, req.into()).await?;
            encode(&TranslationResultDto::from(result))
        })
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Bytes, RpcError> {
    serde_json::to_vec(value).map(Bytes::from).map_err(|e| {
        tracing::error!(error = %e, "failed to encode RPC reply");
        RpcError::internal("internal server error")
    })
}
