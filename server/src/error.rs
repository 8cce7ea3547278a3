use axum::http::header::RETRY_AFTER;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::drawing::{DataUrlError, FramebufferError};
use crate::rate_limit::RateLimited;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),
    #[error(transparent)]
    Framebuffer(#[from] FramebufferError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    RateLimited(#[from] RateLimited),
    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataUrl(_) => StatusCode::BAD_REQUEST,
            AppError::Framebuffer(FramebufferError::QuarterOutOfRange(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Storage(StorageError::NotFound(_) | StorageError::Empty) => {
                StatusCode::NOT_FOUND
            }
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Framebuffer(FramebufferError::Decode(_))
            | AppError::Storage(_)
            | AppError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::RateLimited(limited) = &self {
            let seconds = limited.retry_after.as_secs_f64().ceil().min(u32::MAX as f64) as u32;
            return (
                status,
                [(RETRY_AFTER, seconds.max(1).to_string())],
                "Too Many Requests",
            )
                .into_response();
        }
        (status, self.to_string()).into_response()
    }
}
