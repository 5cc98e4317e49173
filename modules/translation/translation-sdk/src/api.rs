//! Translation use-case trait
//!
//! Contract consumed by every transport adapter. Implementations live
//! outside the adapter layer and must be safe to call concurrently.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::TranslationError;
use crate::models::{TranslationRecord, TranslationRequest, TranslationResult};

/// Translation use case.
///
/// All methods receive the caller's [`RequestContext`]; implementations doing
/// I/O should stop work once the context is cancelled or its deadline passes.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    /// Return the translation history of `ctx.requester()`, in recorded order.
    async fn get_history(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<TranslationRecord>, TranslationError>;

    /// Translate one request.
    ///
    /// The request has already passed validation when called from an adapter.
    async fn do_translate(
        &self,
        ctx: &RequestContext,
        request: TranslationRequest,
    ) -> Result<TranslationResult, TranslationError>;
}
