use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use curia_service::ServiceError;
use curia_session::SessionError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("bind error: {0}")]
    Bind(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(e) => match e {
                ServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::DuplicateSession(_) => StatusCode::CONFLICT,
                ServiceError::CapacityReached(_) => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Session(SessionError::Config(_)) => StatusCode::BAD_REQUEST,
                ServiceError::Session(_) => StatusCode::CONFLICT,
                ServiceError::Store(_) | ServiceError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Bind(_) | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
