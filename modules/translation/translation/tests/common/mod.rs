#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use translation::{TranslationConfig, TranslationModule};
use translation_sdk::{
    RequestContext, TranslationClient, TranslationError, TranslationRecord, TranslationRequest,
    TranslationResult,
};

/// How the mock answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    FailProvider,
    FailStorage,
    Panic,
    Stall,
}

/// Use case double recording every call it receives.
pub struct MockTranslation {
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, TranslationRequest)>>,
}

impl MockTranslation {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requester and input of every `do_translate` call, in order.
    pub fn seen(&self) -> Vec<(String, TranslationRequest)> {
        self.seen.lock().clone()
    }

    async fn outcome(&self) -> Result<(), TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.behavior.lock();
        match behavior {
            Behavior::Succeed => Ok(()),
            Behavior::FailProvider => Err(TranslationError::Provider(
                "upstream rejected api key sk-live-123".into(),
            )),
            Behavior::FailStorage => Err(TranslationError::Storage(
                "postgres://admin:secret@db/translations unreachable".into(),
            )),
            Behavior::Panic => panic!("use case exploded"),
            Behavior::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn record(text: &str, translation: &str) -> TranslationRecord {
    TranslationRecord {
        text: text.into(),
        translation: translation.into(),
        source_lang: "en".into(),
        target_lang: "vi".into(),
        created_at: fixed_time(),
    }
}

#[async_trait]
impl TranslationClient for MockTranslation {
    async fn get_history(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<TranslationRecord>, TranslationError> {
        self.outcome().await?;
        if ctx.requester() == RequestContext::ANONYMOUS {
            return Ok(Vec::new());
        }
        Ok(vec![record("hello", "xin chao"), record("thanks", "cam on")])
    }

    async fn do_translate(
        &self,
        ctx: &RequestContext,
        request: TranslationRequest,
    ) -> Result<TranslationResult, TranslationError> {
        self.seen
            .lock()
            .push((ctx.requester().to_owned(), request.clone()));
        self.outcome().await?;
        Ok(TranslationResult {
            text: format!("{}:{}", request.target_lang, request.text),
            source_lang: request.source_lang,
            target_lang: request.target_lang,
        })
    }
}

pub fn module_with(client: Arc<dyn TranslationClient>, config: TranslationConfig) -> TranslationModule {
    TranslationModule::new(config, client, CancellationToken::new())
}

pub fn module(client: Arc<dyn TranslationClient>) -> TranslationModule {
    module_with(client, TranslationConfig::default())
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send `req` through `router` and decode the JSON body (`Null` when empty).
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
