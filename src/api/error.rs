use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::engine::EngineFailure;
use crate::model::JsonResult;

/// Every way a request can fail. Only the display string and the status
/// reach the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed query parameter
    #[error("validating queries: {0}")]
    Query(String),

    /// The working directory has not been initialized.
    /// Reported as 500 rather than a precondition failure.
    #[error("Terraform folder is not initialized: {source}")]
    NeedsInit { source: EngineFailure },

    #[error("running Terraform command \"{command}\" failed: {source}")]
    Engine {
        command: &'static str,
        source: EngineFailure,
    },

    /// The success payload could not be encoded
    #[error("building (marshal) JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::NeedsInit { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Engine { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("{}", self);
        (self.status_code(), Json(JsonResult::message(self.to_string()))).into_response()
    }
}
