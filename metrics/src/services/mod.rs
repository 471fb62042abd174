pub mod metrics;
pub use metrics::MetricsService;

use axum::{
    response::IntoResponse,
    http::StatusCode,
    Json
};
use crate::api::models::ApiResponse;
use tracing::warn;

/// Failure of a process request as seen by HTTP clients.
#[derive(Debug)]
pub enum AppError {
    UnknownProcess(String),
    Process(common::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownProcess(_) => StatusCode::NOT_FOUND,
            AppError::Process(common::Error::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            AppError::Process(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::UnknownProcess(id) => format!("Unknown process '{}'", id),
            AppError::Process(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status();
        let message = self.message();

        warn!(status = %status_code, error = %message, "Process request failed");
        (status_code, Json(ApiResponse::<()>::failed(message))).into_response()
    }
}

impl From<common::Error> for AppError {
    fn from(err: common::Error) -> Self {
        AppError::Process(err)
    }
}
