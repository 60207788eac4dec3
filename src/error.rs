use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::players::error::StoreError;

/// Failures no handler turns into a flash message. Rendered as the catch-all
/// plain-text 500; the real cause only goes to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "unhandled server error");
        (StatusCode::INTERNAL_SERVER_ERROR, "Sisemine serveri viga.").into_response()
    }
}
