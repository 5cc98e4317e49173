//! Per-call context threaded from the inbound request to the use case.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Reason a scoped operation stopped before completing.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Identity, cancellation and deadline of one inbound call.
///
/// Adapters build one context per request; the cancellation token is usually
/// a child of the server's shutdown token so in-flight calls observe shutdown.
#[derive(Debug, Clone)]
pub struct RequestContext {
    requester: String,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Requester identity used when the transport carries none.
    pub const ANONYMOUS: &'static str = "anonymous";

    /// Create a context for `requester`. Blank identities become [`Self::ANONYMOUS`].
    #[must_use]
    pub fn new(requester: impl Into<String>) -> Self {
        let requester = requester.into();
        let requester = if requester.trim().is_empty() {
            Self::ANONYMOUS.to_owned()
        } else {
            requester.trim().to_owned()
        };
        Self {
            requester,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS)
    }

    /// Replace the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Bound the call by `timeout` from now. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bound the call by `deadline`. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    #[must_use]
    pub fn requester(&self) -> &str {
        &self.requester
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` until it completes, the context is cancelled, or the deadline passes.
    ///
    /// On interruption `fut` is dropped, so no work outlives the call.
    ///
    /// # Errors
    /// Returns [`Interrupted`] if cancellation or the deadline wins the race.
    pub async fn scope<F, T>(&self, fut: F) -> Result<T, Interrupted>
    where
        F: Future<Output = T>,
    {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            () = deadline => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
