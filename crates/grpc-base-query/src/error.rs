use crate::status::Code;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Error half of a settled call: the status code and message the call ended with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct GrpcQueryError {
    pub code: Code,
    pub message: String,
}

impl GrpcQueryError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The transport let go of the call without ever reporting a status.
    pub(crate) fn ended_without_status() -> Self {
        Self::new(Code::Unknown, "call ended without a status")
    }

    /// The transport panicked while dispatching the call.
    pub(crate) fn dispatch_panicked(payload: &(dyn Any + Send)) -> Self {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|reason| reason.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::new(Code::Unknown, format!("Dispatch panicked: {reason}"))
    }
}

impl From<tonic::Status> for GrpcQueryError {
    fn from(status: tonic::Status) -> Self {
        Self::new(status.code().into(), status.message())
    }
}

/// Failures raised synchronously when a transport refuses to dispatch a call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("No host configured")]
    MissingHost,

    #[error("Invalid host `{host}`: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Invalid method path `{0}`")]
    InvalidPath(String),

    #[error("Invalid metadata entry `{0}`")]
    InvalidMetadata(String),

    #[error("Client streaming is not supported for `{0}`")]
    ClientStreamingUnsupported(String),

    #[error("No Tokio runtime available to drive the call")]
    NoRuntime,

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

impl From<TransportError> for GrpcQueryError {
    fn from(err: TransportError) -> Self {
        GrpcQueryError::new(Code::Unknown, err.to_string())
    }
}
