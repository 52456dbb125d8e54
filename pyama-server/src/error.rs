//! HTTP error mapping.
//!
//! Bootstrap errors are 400 (the client must re-select paths), validation
//! errors are 422 with the violated bound spelled out, everything internal
//! is 500. Rejection bodies follow the `{"detail": ...}` shape the frontend
//! already consumes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use pyama_pipeline::ValidateError;

/// Errors any handler can surface.
#[derive(Debug)]
pub enum ApiError {
    Core(pyama_core::Error),
    Io(pyama_io::Error),
    Validate(ValidateError),
}

impl From<pyama_core::Error> for ApiError {
    fn from(err: pyama_core::Error) -> Self {
        Self::Core(err)
    }
}

impl From<pyama_io::Error> for ApiError {
    fn from(err: pyama_io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ValidateError> for ApiError {
    fn from(err: ValidateError) -> Self {
        Self::Validate(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(pyama_core::Error::NotBootstrapped) => StatusCode::BAD_REQUEST,
            ApiError::Core(pyama_core::Error::Render(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(_) | ApiError::Validate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Io(pyama_io::Error::InvalidPath { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Core(err) => err.to_string(),
            ApiError::Io(err) => err.to_string(),
            ApiError::Validate(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail() }));
        (self.status(), body).into_response()
    }
}
