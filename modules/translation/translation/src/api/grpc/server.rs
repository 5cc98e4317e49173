//! gRPC service implementation.
//!
//! Converts proto messages to use-case models, delegates to the shared
//! [`Invoker`] and maps failures to `Status` codes.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tonic::metadata::MetadataMap;
use tonic::{Code, Request, Response, Status};

use translation_sdk::proto::{
    DoTranslateRequest, DoTranslateResponse, GetHistoryRequest, GetHistoryResponse,
    TranslationRecord as ProtoRecord,
};
use translation_sdk::{RequestContext, TranslationGrpc, TranslationRecord, TranslationRequest};

use crate::api::{AdapterError, Invoker, REQUESTER_HEADER};

/// Taken off the client's `grpc-timeout`. Tonic starts its own timer for the
/// header when the request arrives and answers `Cancelled` when it fires, so
/// the call context has to expire first to report `DeadlineExceeded`.
const DEADLINE_MARGIN: Duration = Duration::from_millis(10);

/// gRPC service wrapping the shared invoker.
#[derive(Clone)]
pub struct TranslationGrpcService {
    invoker: Arc<Invoker>,
}

impl TranslationGrpcService {
    #[must_use]
    pub fn new(invoker: Arc<Invoker>) -> Self {
        Self { invoker }
    }

    fn context(&self, metadata: &MetadataMap) -> RequestContext {
        let requester = metadata.get(REQUESTER_HEADER).and_then(|v| v.to_str().ok());
        let ctx = self.invoker.context(requester);
        match grpc_timeout(metadata) {
            Some(timeout) => ctx.with_timeout(timeout.saturating_sub(DEADLINE_MARGIN)),
            None => ctx,
        }
    }
}

#[tonic::async_trait]
impl TranslationGrpc for TranslationGrpcService {
    async fn get_history(
        &self,
        request: Request<GetHistoryRequest>,
    ) -> Result<Response<GetHistoryResponse>, Status> {
        let ctx = self.context(request.metadata());
        let history = observe("GetHistory", &ctx, self.invoker.get_history(&ctx)).await?;

        Ok(Response::new(GetHistoryResponse {
            history: history.into_iter().map(to_proto_record).collect(),
        }))
    }

    async fn do_translate(
        &self,
        request: Request<DoTranslateRequest>,
    ) -> Result<Response<DoTranslateResponse>, Status> {
        let ctx = self.context(request.metadata());
        let req = request.into_inner();
        let input = TranslationRequest::new(req.text, req.source_lang, req.target_lang);

        let result = observe("DoTranslate", &ctx, self.invoker.do_translate(&ctx, input)).await?;

        Ok(Response::new(DoTranslateResponse {
            text: result.text,
            source_lang: result.source_lang,
            target_lang: result.target_lang,
        }))
    }
}

/// Run one RPC, logging method, resulting code and latency.
async fn observe<T>(
    method: &'static str,
    ctx: &RequestContext,
    call: impl Future<Output = Result<T, AdapterError>>,
) -> Result<T, Status> {
    let started = Instant::now();
    let out = call.await.map_err(Status::from);
    let code = out.as_ref().map_or_else(Status::code, |_| Code::Ok);
    tracing::info!(
        method,
        requester = ctx.requester(),
        code = %code.description(),
        latency_ms = started.elapsed().as_millis(),
        "grpc request served"
    );
    out
}

fn to_proto_record(record: TranslationRecord) -> ProtoRecord {
    ProtoRecord {
        text: record.text,
        translation: record.translation,
        source_lang: record.source_lang,
        target_lang: record.target_lang,
        created_at: record.created_at.to_rfc3339(),
    }
}

/// Parse the `grpc-timeout` header: up to 8 digits followed by a unit.
fn grpc_timeout(metadata: &MetadataMap) -> Option<Duration> {
    let value = metadata.get("grpc-timeout")?.to_str().ok()?;
    if value.len() < 2 || value.len() > 9 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    let amount: u64 = digits.parse().ok()?;
    match unit {
        "H" => Some(Duration::from_secs(amount.saturating_mul(3600))),
        "M" => Some(Duration::from_secs(amount.saturating_mul(60))),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}
