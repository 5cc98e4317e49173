//! In-memory translation use case.
//!
//! Reference implementation of [`TranslationClient`] used by the server
//! binary and by tests. It keeps each requester's history in memory and
//! "translates" by tagging the text with the target language.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use translation_sdk::{
    RequestContext, TranslationClient, TranslationError, TranslationRecord, TranslationRequest,
    TranslationResult,
};

/// Stateful in-memory use case. Safe to share across adapters.
#[derive(Default)]
pub struct InMemoryTranslation {
    history: RwLock<HashMap<String, Vec<TranslationRecord>>>,
}

impl InMemoryTranslation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn translate(request: &TranslationRequest) -> TranslationResult {
        TranslationResult {
            text: format!("[{}] {}", request.target_lang, request.text),
            source_lang: request.source_lang.clone(),
            target_lang: request.target_lang.clone(),
        }
    }
}

#[async_trait]
impl TranslationClient for InMemoryTranslation {
    async fn get_history(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<TranslationRecord>, TranslationError> {
        if ctx.is_cancelled() {
            return Err(TranslationError::Cancelled);
        }
        let history = self
            .history
            .read()
            .get(ctx.requester())
            .cloned()
            .unwrap_or_default();
        debug!(requester = ctx.requester(), records = history.len(), "history loaded");
        Ok(history)
    }

    async fn do_translate(
        &self,
        ctx: &RequestContext,
        request: TranslationRequest,
    ) -> Result<TranslationResult, TranslationError> {
        if ctx.is_cancelled() {
            return Err(TranslationError::Cancelled);
        }
        let result = Self::translate(&request);
        let record = TranslationRecord::new(&request, &result, Utc::now());
        self.history
            .write()
            .entry(ctx.requester().to_owned())
            .or_default()
            .push(record);
        debug!(
            requester = ctx.requester(),
            source_lang = %result.source_lang,
            target_lang = %result.target_lang,
            "translation recorded"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn translate_tags_target_language() {
        let svc = InMemoryTranslation::new();
        let out = svc
            .do_translate(&RequestContext::anonymous(), TranslationRequest::new("hello", "en", "vi"))
            .await
            .unwrap();
        assert_eq!(out.text, "[vi] hello");
        assert_eq!(out.source_lang, "en");
        assert_eq!(out.target_lang, "vi");
    }

    #[tokio::test]
    async fn history_is_per_requester_in_insertion_order() {
        let svc = InMemoryTranslation::new();
        let alice = RequestContext::new("alice");
        let bob = RequestContext::new("bob");

        svc.do_translate(&alice, TranslationRequest::new("one", "en", "vi"))
            .await
            .unwrap();
        svc.do_translate(&bob, TranslationRequest::new("other", "en", "fr"))
            .await
            .unwrap();
        svc.do_translate(&alice, TranslationRequest::new("two", "en", "de"))
            .await
            .unwrap();

        let history = svc.get_history(&alice).await.unwrap();
        let texts: Vec<_> = history.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(history[1].translation, "[de] two");
        assert!(history[0].created_at <= history[1].created_at);

        assert_eq!(svc.get_history(&bob).await.unwrap().len(), 1);
        assert!(svc.get_history(&RequestContext::anonymous()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_context_is_honored() {
        let svc = InMemoryTranslation::new();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::new("alice").with_cancellation(token);

        let err = svc
            .do_translate(&ctx, TranslationRequest::new("hello", "en", "vi"))
            .await
            .unwrap_err();
        assert_eq!(err, TranslationError::Cancelled);
        assert_eq!(svc.get_history(&ctx).await, Err(TranslationError::Cancelled));
    }
}
