use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::views;

#[derive(Debug, ThisError)]
pub enum CarlotError {
    #[error("car {0} does not exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Multipart request rejected: {0}")]
    MultipartRequest(#[from] MultipartRejection),

    #[error("Request body rejected: {0}")]
    Body(#[from] BytesRejection),
}

impl IntoResponse for CarlotError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            CarlotError::NotFound(id) => (StatusCode::NOT_FOUND, format!("No car with id {id}.")),
            CarlotError::Multipart(e) => (e.status(), e.body_text()),
            CarlotError::MultipartRequest(e) => (e.status(), e.body_text()),
            CarlotError::Body(e) => (e.status(), e.body_text()),
            CarlotError::DatabaseError(_) | CarlotError::Io(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, Html(views::error_page(status, &message))).into_response()
    }
}
