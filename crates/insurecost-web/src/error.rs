//! Error type returned by API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use insurecost_client::SubmitError;
use insurecost_common::InsureCostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Form(#[from] InsureCostError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Form(_) => StatusCode::BAD_REQUEST,
            ApiError::Submit(SubmitError::AlreadyPending) => StatusCode::CONFLICT,
            ApiError::Submit(SubmitError::ShutDown) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
