//! gRPC mapping of [`AdapterError`].

use tonic::Status;

use crate::api::AdapterError;

impl From<AdapterError> for Status {
    fn from(err: AdapterError) -> Self {
        let message = err.public_message();
        match err {
            AdapterError::Decode(_) | AdapterError::Validation(_) => Status::invalid_argument(message),
            AdapterError::Port { .. } | AdapterError::Panic(_) => Status::internal(message),
            AdapterError::DeadlineExceeded => Status::deadline_exceeded(message),
            AdapterError::Cancelled => Status::cancelled(message),
        }
    }
}
