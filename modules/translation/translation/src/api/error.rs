//! Transport-neutral adapter errors.
//!
//! Each transport maps [`AdapterError`] into its native representation
//! (HTTP status + `ErrorResponse`, gRPC `Status`, RPC error reply). The
//! messages returned by [`AdapterError::public_message`] are the only error
//! text that crosses a protocol boundary.

use translation_sdk::TranslationError;

use crate::validation::ValidationError;

/// Use-case operation, used for logging and generic failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetHistory,
    DoTranslate,
}

impl Operation {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetHistory => "get_history",
            Self::DoTranslate => "do_translate",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            Self::GetHistory => "database problems",
            Self::DoTranslate => "translation service problems",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    /// Payload could not be decoded. The detail is logged, not returned.
    #[error("invalid request body: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{} failed: {source}", .operation.name())]
    Port {
        operation: Operation,
        source: TranslationError,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The use case panicked; the panic was recovered.
    #[error("unexpected failure in {}", .0.name())]
    Panic(Operation),
}

impl AdapterError {
    /// Map a use-case error, keeping cancellation and deadline distinct.
    #[must_use]
    pub fn port(operation: Operation, source: TranslationError) -> Self {
        match source {
            TranslationError::Cancelled => Self::Cancelled,
            TranslationError::DeadlineExceeded => Self::DeadlineExceeded,
            source => Self::Port { operation, source },
        }
    }

    /// Message safe to return to callers.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Decode(_) => "invalid request body".to_owned(),
            Self::Validation(e) => e.to_string(),
            Self::Port { operation, .. } => operation.failure_message().to_owned(),
            Self::Cancelled => "request cancelled".to_owned(),
            Self::DeadlineExceeded => "deadline exceeded".to_owned(),
            Self::Panic(_) => "internal server error".to_owned(),
        }
    }

    /// Whether the caller sent something unacceptable (as opposed to a server-side failure).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Validation(_))
    }
}
