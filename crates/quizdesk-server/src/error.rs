//! HTTP error mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use quizdesk_core::error::SessionError;

/// Body of every error reply.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors a handler can return. Each renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The request body is missing or not the expected shape.
    #[error("{0}")]
    BadRequest(String),

    /// Something failed on our side.
    #[error("server error processing submission")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::NoActiveQuiz) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Session(
                SessionError::SessionInvalid
                | SessionError::AlreadySubmitted
                | SessionError::SessionExpired,
            ) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
