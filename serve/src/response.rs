//! Error responses: `{"detail": "..."}` with a status derived from the error kind.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nl2sql::{Error, ErrorKind, ErrorResponse};
use tracing::warn;

#[derive(Debug)]
pub enum ApiError {
    /// Failure from the pipeline.
    Pipeline(Error),
    /// Request body is not valid JSON or lacks `query`.
    BadBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) => match e.kind() {
                ErrorKind::Execution => StatusCode::BAD_REQUEST,
                ErrorKind::Generation => StatusCode::BAD_GATEWAY,
                ErrorKind::Connectivity => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Pipeline(e) => e.to_string(),
            ApiError::BadBody(msg) => msg.clone(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Pipeline(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        ApiError::BadBody(r.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        warn!(status = status.as_u16(), detail = %detail, "request failed");
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
