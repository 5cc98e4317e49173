//! HTTP mapping of [`AdapterError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::AdapterError;
use crate::api::dto::ErrorResponse;

/// Non-standard status used when the caller went away before the call finished.
#[must_use]
pub fn client_closed_request() -> StatusCode {
    StatusCode::from_u16(499).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
}

impl AdapterError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Port { .. } | Self::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            Self::Cancelled => client_closed_request(),
        }
    }
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        if let Self::Decode(detail) = &self {
            tracing::debug!(%detail, "request body rejected");
        }
        (
            self.status_code(),
            Json(ErrorResponse::new(self.public_message())),
        )
            .into_response()
    }
}
