// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{grading::GradingError, store::StoreError};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden (e.g., a student publishing a summary)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate email)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Maps grading failures onto client-facing statuses.
/// A broken answer key is an authoring defect, so it surfaces as a 500.
impl From<GradingError> for AppError {
    fn from(err: GradingError) -> Self {
        match err {
            GradingError::QuizNotFound(_) => AppError::NotFound("Quiz not found".to_string()),
            GradingError::AlreadySubmitted { .. } | GradingError::EmptyQuestionSet(_) => {
                AppError::BadRequest(err.to_string())
            }
            GradingError::InvalidAnswerKey { .. } | GradingError::StorageUnavailable(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::Conflict(format!("Already exists: {}", msg)),
            StoreError::Unavailable(_) | StoreError::Corrupt(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies are a plain 400 rather than axum's 422.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grading_errors_map_to_statuses() {
        let cases = [
            (GradingError::QuizNotFound(1), StatusCode::NOT_FOUND),
            (
                GradingError::AlreadySubmitted {
                    user_id: 1,
                    quiz_id: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
            (GradingError::EmptyQuestionSet(1), StatusCode::BAD_REQUEST),
            (
                GradingError::InvalidAnswerKey {
                    question_id: 1,
                    key: "Z".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GradingError::StorageUnavailable("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn duplicate_rows_are_conflicts() {
        let response = AppError::from(StoreError::Duplicate("email".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
