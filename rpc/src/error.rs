//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use herdguard_store::StoreError;
use herdguard_verification::VerificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Server(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for RpcError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => RpcError::StoreUnavailable(msg),
            StoreError::NotFound(what) => RpcError::NotFound(format!("{what} not found")),
            StoreError::Duplicate(key) => RpcError::InvalidRequest(format!("{key} already exists")),
            StoreError::Invalid(msg) => RpcError::InvalidRequest(msg),
            other => RpcError::Internal(other.to_string()),
        }
    }
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::Store(inner) => inner.into(),
            other => RpcError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
