//! Mapping of [`TaskError`] onto HTTP responses.

use crate::error::{ErrorCode, TaskError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::MissingRequiredField | ErrorCode::InvalidFieldValue => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = status_for(self.code);
        let detail = match self.code {
            ErrorCode::InternalError => {
                error!(error = %self.message, "Unexpected error while handling request");
                "Internal server error".to_string()
            }
            ErrorCode::DatabaseError => {
                error!(error = %self.message, "Storage failure while handling request");
                self.message
            }
            _ => {
                warn!(status = status.as_u16(), detail = %self.message, "Request rejected");
                self.message
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<JsonRejection> for TaskError {
    fn from(rejection: JsonRejection) -> Self {
        TaskError::invalid_value("body", rejection.body_text())
    }
}

impl From<PathRejection> for TaskError {
    fn from(rejection: PathRejection) -> Self {
        TaskError::invalid_value("task_id", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_status() {
        assert_eq!(
            status_for(ErrorCode::MissingRequiredField),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ErrorCode::InvalidFieldValue),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorCode::TaskNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorCode::DatabaseError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(ErrorCode::InternalError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let response = TaskError::internal("secret stack trace").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.detail, "Internal server error");
    }

    #[tokio::test]
    async fn database_errors_keep_their_message() {
        let response = TaskError::database("disk I/O error").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_of(response).await.detail,
            "Database error: disk I/O error"
        );
    }

    #[test]
    fn not_found_response_status() {
        let response = TaskError::task_not_found(5).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
