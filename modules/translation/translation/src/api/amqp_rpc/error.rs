use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::AdapterError;

/// Machine-readable code of an RPC error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcErrorCode {
    InvalidArgument,
    Internal,
    DeadlineExceeded,
    Cancelled,
    UnknownMethod,
}

impl RpcErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Internal => "internal",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Cancelled => "cancelled",
            Self::UnknownMethod => "unknown_method",
        }
    }
}

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body of an RPC reply: `{"code": "...", "message": "..."}`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: RpcErrorCode,
    pub message: String,
}

impl RpcError {
    #[must_use]
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::Internal, message)
    }

    #[must_use]
    pub fn unknown_method(method: &str) -> Self {
        Self::new(
            RpcErrorCode::UnknownMethod,
            format!("unknown method: {method}"),
        )
    }
}

impl From<AdapterError> for RpcError {
    fn from(err: AdapterError) -> Self {
        let code = match &err {
            AdapterError::Decode(_) | AdapterError::Validation(_) => RpcErrorCode::InvalidArgument,
            AdapterError::Port { .. } | AdapterError::Panic(_) => RpcErrorCode::Internal,
            AdapterError::DeadlineExceeded => RpcErrorCode::DeadlineExceeded,
            AdapterError::Cancelled => RpcErrorCode::Cancelled,
        };
        Self::new(code, err.public_message())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case_code() {
        let err = RpcError::unknown_method("v2.nope");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "unknown_method");
        assert_eq!(json["message"], "unknown method: v2.nope");
    }

    #[test]
    fn decode_maps_to_invalid_argument() {
        let err = RpcError::from(AdapterError::Decode("trailing characters".into()));
        assert_eq!(err.code, RpcErrorCode::InvalidArgument);
        assert_eq!(err.message, "invalid request body");
    }
}
