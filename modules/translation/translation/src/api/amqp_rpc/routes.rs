//! Method-name routing table for RPC calls.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::error::RpcError;
use crate::api::panic_message;

/// Decoded inbound call handed to a handler.
#[derive(Debug, Clone, Default)]
pub struct RpcCall {
    /// Requester identity from the message headers, if any.
    pub requester: Option<String>,
    /// Raw message body.
    pub body: Bytes,
}

pub type CallFuture = BoxFuture<'static, Result<Bytes, RpcError>>;

/// A named call handler: raw body in, raw reply body or error out.
pub type CallHandler = Arc<dyn Fn(RpcCall) -> CallFuture + Send + Sync>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("RPC method '{0}' is already registered")]
    Duplicate(String),
}

/// Collects handlers before the table is frozen.
#[derive(Default)]
pub struct RpcRoutesBuilder {
    handlers: HashMap<String, CallHandler>,
}

impl RpcRoutesBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`RouteError::Duplicate`] if `method` already has a handler.
    pub fn register(
        &mut self,
        method: impl Into<String>,
        handler: CallHandler,
    ) -> Result<&mut Self, RouteError> {
        let method = method.into();
        if self.handlers.contains_key(&method) {
            return Err(RouteError::Duplicate(method));
        }
        tracing::debug!(%method, "registered RPC method");
        self.handlers.insert(method, handler);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> RpcRoutes {
        RpcRoutes {
            handlers: Arc::new(self.handlers),
        }
    }
}

/// Immutable routing table, cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct RpcRoutes {
    handlers: Arc<HashMap<String, CallHandler>>,
}

impl RpcRoutes {
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&CallHandler> {
        self.handlers.get(method)
    }

    /// Registered method names, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler registered for `method`, recovering from panics.
    ///
    /// # Errors
    /// Returns the handler's error, `unknown_method` for unregistered names,
    /// or `internal` if the handler panicked.
    pub async fn dispatch(&self, method: &str, call: RpcCall) -> Result<Bytes, RpcError> {
        let Some(handler) = self.get(method) else {
            tracing::warn!(method, "no handler for RPC method");
            return Err(RpcError::unknown_method(method));
        };

        match AssertUnwindSafe(handler(call)).catch_unwind().await {
            Ok(out) => out,
            Err(payload) => {
                tracing::error!(
                    method,
                    panic = %panic_message(payload.as_ref()),
                    "recovered from panic in RPC handler"
                );
                Err(RpcError::internal("internal server error"))
            }
        }
    }
}

impl std::fmt::Debug for RpcRoutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcRoutes")
            .field("methods", &self.methods())
            .finish()
    }
}
