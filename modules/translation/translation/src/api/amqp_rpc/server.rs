//! RPC consumer loop.
//!
//! The broker transport is outside this crate: it decodes messages into
//! [`Delivery`] values, pushes them into a channel and publishes each
//! [`RpcReply`] to the caller's reply queue. The server dispatches every
//! delivery on its own task, bounded by `max_in_flight`.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tokio::sync::{Semaphore, mpsc, oneshot};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::error::RpcError;
use super::routes::{RpcCall, RpcRoutes};
use crate::config::RpcConfig;

/// One inbound request message.
#[derive(Debug)]
pub struct Delivery {
    pub method: String,
    pub correlation_id: String,
    pub requester: Option<String>,
    pub body: Bytes,
    pub reply_to: oneshot::Sender<RpcReply>,
}

impl Delivery {
    /// Build a delivery together with the receiver of its reply.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        correlation_id: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> (Self, oneshot::Receiver<RpcReply>) {
        let (reply_to, reply) = oneshot::channel();
        (
            Self {
                method: method.into(),
                correlation_id: correlation_id.into(),
                requester: None,
                body: body.into(),
                reply_to,
            },
            reply,
        )
    }

    #[must_use]
    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Success,
    Error,
}

impl ReplyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Reply to one delivery, tagged with its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcReply {
    pub correlation_id: String,
    pub status: ReplyStatus,
    pub body: Bytes,
}

impl RpcReply {
    #[must_use]
    pub fn success(correlation_id: String, body: Bytes) -> Self {
        Self {
            correlation_id,
            status: ReplyStatus::Success,
            body,
        }
    }

    #[must_use]
    pub fn failure(correlation_id: String, error: &RpcError) -> Self {
        // RpcError is two plain strings, serialization does not fail
        let body = serde_json::to_vec(error).unwrap_or_default();
        Self {
            correlation_id,
            status: ReplyStatus::Error,
            body: Bytes::from(body),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Success
    }

    /// Decode the error body of a failed reply.
    #[must_use]
    pub fn error(&self) -> Option<RpcError> {
        match self.status {
            ReplyStatus::Error => serde_json::from_slice(&self.body).ok(),
            ReplyStatus::Success => None,
        }
    }
}

pub struct RpcServer {
    routes: RpcRoutes,
    max_in_flight: usize,
}

impl RpcServer {
    #[must_use]
    pub fn new(routes: RpcRoutes, cfg: &RpcConfig) -> Self {
        Self {
            routes,
            max_in_flight: cfg.max_in_flight.max(1),
        }
    }

    #[must_use]
    pub fn routes(&self) -> &RpcRoutes {
        &self.routes
    }

    /// Dispatch a single delivery and send its reply.
    pub async fn handle(&self, delivery: Delivery) {
        handle_delivery(&self.routes, delivery).await;
    }

    /// Consume `inbox` until it closes or `cancel` fires, then wait for
    /// in-flight calls to reply.
    ///
    /// # Errors
    /// Returns an error if the concurrency limiter is closed unexpectedly.
    pub async fn serve(
        self,
        mut inbox: mpsc::Receiver<Delivery>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let limiter = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();
        tracing::info!(
            methods = ?self.routes.methods(),
            max_in_flight = self.max_in_flight,
            "RPC server started"
        );

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "RPC task failed");
                    }
                }
                delivery = inbox.recv() => {
                    let Some(delivery) = delivery else { break };
                    let permit = Arc::clone(&limiter).acquire_owned().await?;
                    let routes = self.routes.clone();
                    tasks.spawn(async move {
                        handle_delivery(&routes, delivery).await;
                        drop(permit);
                    });
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "RPC task failed");
            }
        }
        tracing::info!("RPC server stopped");
        Ok(())
    }
}

async fn handle_delivery(routes: &RpcRoutes, delivery: Delivery) {
    let Delivery {
        method,
        correlation_id,
        requester,
        body,
        reply_to,
    } = delivery;
    let started = Instant::now();

    let reply = match routes.dispatch(&method, RpcCall { requester, body }).await {
        Ok(body) => RpcReply::success(correlation_id, body),
        Err(e) => RpcReply::failure(correlation_id, &e),
    };
    tracing::info!(
        method = %method,
        correlation_id = %reply.correlation_id,
        status = reply.status.as_str(),
        latency_ms = started.elapsed().as_millis(),
        "rpc call served"
    );

    if reply_to.send(reply).is_err() {
        tracing::warn!(method = %method, "RPC reply dropped: caller went away");
    }
}
