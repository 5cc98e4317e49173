//! The call pipeline shared by all adapters.
//!
//! An [`Invoker`] binds one use-case instance and one validator. Each call is
//! validated, then run under the request context (cancellation and deadline)
//! with panic recovery, and its outcome is logged and mapped to [`AdapterError`].

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use translation_sdk::{
    Interrupted, RequestContext, TranslationClient, TranslationError, TranslationRecord,
    TranslationRequest, TranslationResult,
};

use super::{AdapterError, Operation, panic_message};
use crate::validation::Validator;

pub struct Invoker {
    client: Arc<dyn TranslationClient>,
    validator: Validator,
    shutdown: CancellationToken,
    request_timeout: Duration,
}

impl Invoker {
    #[must_use]
    pub fn new(
        client: Arc<dyn TranslationClient>,
        validator: Validator,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client,
            validator,
            shutdown: CancellationToken::new(),
            request_timeout,
        }
    }

    /// Tie every request context to `shutdown`, so in-flight calls stop with the server.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Build the context of one inbound call.
    #[must_use]
    pub fn context(&self, requester: Option<&str>) -> RequestContext {
        RequestContext::new(requester.unwrap_or_default())
            .with_cancellation(self.shutdown.child_token())
            .with_timeout(self.request_timeout)
    }

    /// # Errors
    /// See [`AdapterError`].
    pub async fn get_history(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<TranslationRecord>, AdapterError> {
        self.invoke(ctx, Operation::GetHistory, self.client.get_history(ctx))
            .await
    }

    /// Validate `request`, then translate it. The use case is not reached on
    /// validation failure.
    ///
    /// # Errors
    /// See [`AdapterError`].
    pub async fn do_translate(
        &self,
        ctx: &RequestContext,
        request: TranslationRequest,
    ) -> Result<TranslationResult, AdapterError> {
        self.validator.validate(&request)?;
        self.invoke(
            ctx,
            Operation::DoTranslate,
            self.client.do_translate(ctx, request),
        )
        .await
    }

    async fn invoke<T, F>(
        &self,
        ctx: &RequestContext,
        operation: Operation,
        call: F,
    ) -> Result<T, AdapterError>
    where
        F: Future<Output = Result<T, TranslationError>>,
    {
        let guarded = AssertUnwindSafe(call).catch_unwind();
        match ctx.scope(guarded).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => {
                error!(
                    operation = operation.name(),
                    requester = ctx.requester(),
                    error = %e,
                    "use case failed"
                );
                Err(AdapterError::port(operation, e))
            }
            Ok(Err(payload)) => {
                error!(
                    operation = operation.name(),
                    panic = %panic_message(payload.as_ref()),
                    "recovered from panic in use case"
                );
                Err(AdapterError::Panic(operation))
            }
            Err(Interrupted::Cancelled) => {
                warn!(operation = operation.name(), "call cancelled");
                Err(AdapterError::Cancelled)
            }
            Err(Interrupted::DeadlineExceeded) => {
                warn!(
                    operation = operation.name(),
                    timeout_ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX),
                    "call deadline exceeded"
                );
                Err(AdapterError::DeadlineExceeded)
            }
        }
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("validator", &self.validator)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        calls: AtomicUsize,
        behavior: fn() -> Result<TranslationResult, TranslationError>,
        delay: Option<Duration>,
    }

    impl Scripted {
        fn new(behavior: fn() -> Result<TranslationResult, TranslationError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                behavior,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl TranslationClient for Scripted {
        async fn get_history(
            &self,
            _ctx: &RequestContext,
        ) -> Result<Vec<TranslationRecord>, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TranslationError::Storage("db down".into()))
        }

        async fn do_translate(
            &self,
            _ctx: &RequestContext,
            _request: TranslationRequest,
        ) -> Result<TranslationResult, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.behavior)()
        }
    }

    fn ok() -> Result<TranslationResult, TranslationError> {
        Ok(TranslationResult {
            text: "xin chao".into(),
            source_lang: "en".into(),
            target_lang: "vi".into(),
        })
    }

    fn boom() -> Result<TranslationResult, TranslationError> {
        panic!("boom")
    }

    fn invoker(client: Arc<Scripted>) -> Invoker {
        Invoker::new(client, Validator::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_use_case() {
        let client = Arc::new(Scripted::new(ok));
        let invoker = invoker(client.clone());
        let ctx = invoker.context(None);

        let err = invoker
            .do_translate(&ctx, TranslationRequest::new("", "en", "vi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Validation(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn port_error_is_mapped() {
        let client = Arc::new(Scripted::new(ok));
        let invoker = invoker(client);
        let ctx = invoker.context(Some("alice"));

        let err = invoker.get_history(&ctx).await.unwrap_err();
        assert_eq!(err.public_message(), "database problems");
    }

    #[tokio::test]
    async fn panic_is_recovered() {
        let invoker = invoker(Arc::new(Scripted::new(boom)));
        let ctx = invoker.context(None);

        let err = invoker
            .do_translate(&ctx, TranslationRequest::new("hi", "en", "vi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Panic(Operation::DoTranslate)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_stops_slow_call() {
        let mut scripted = Scripted::new(ok);
        scripted.delay = Some(Duration::from_secs(60));
        let invoker = Invoker::new(
            Arc::new(scripted),
            Validator::new(),
            Duration::from_millis(100),
        );
        let ctx = invoker.context(None);

        let err = invoker
            .do_translate(&ctx, TranslationRequest::new("hi", "en", "vi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn shutdown_cancels_contexts() {
        let shutdown = CancellationToken::new();
        let invoker = invoker(Arc::new(Scripted::new(ok))).with_shutdown(shutdown.clone());
        let ctx = invoker.context(Some("alice"));
        assert_eq!(ctx.requester(), "alice");

        shutdown.cancel();
        assert!(ctx.is_cancelled());
        let err = invoker
            .do_translate(&ctx, TranslationRequest::new("hi", "en", "vi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Cancelled));
    }

    #[test]
    fn missing_requester_is_anonymous() {
        let invoker = invoker(Arc::new(Scripted::new(ok)));
        assert_eq!(
            invoker.context(None).requester(),
            RequestContext::ANONYMOUS
        );
        assert_eq!(
            invoker.context(Some("  ")).requester(),
            RequestContext::ANONYMOUS
        );
    }
}
