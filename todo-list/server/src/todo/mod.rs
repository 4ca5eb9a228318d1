use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use todo_list::{TodoService, TodoServiceError};

pub mod api;

pub use api::create_api_router;

/// Shared state for the todo handlers.
pub struct TodoState {
    pub service: TodoService,
}

impl TodoState {
    pub fn new(service: TodoService) -> Self {
        Self { service }
    }
}

/// Custom error type for todo handler operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Represents a todo service error.
    #[error(transparent)]
    Service(#[from] TodoServiceError),
    /// Represents a request body that could not be parsed.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for TodoError {
    fn from(rejection: JsonRejection) -> Self {
        TodoError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let (status_code, user_facing_error_message) = match &self {
            TodoError::Service(TodoServiceError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            TodoError::Service(TodoServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Todo not found".to_string())
            }
            TodoError::Service(TodoServiceError::Storage(err)) => {
                tracing::error!("Failed to persist todos: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save todos. Please try again later.".to_string(),
                )
            }
            TodoError::InvalidBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };
        (
            status_code,
            Json(api::ErrorResponse::new(user_facing_error_message)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_list::{StoreError, ValidationError};

    async fn error_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn can_map_validation_error_to_bad_request() {
        let error = TodoError::from(TodoServiceError::from(ValidationError::EmptyTitle));

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(response).await["error"],
            "Title must not be empty"
        );
    }

    #[tokio::test]
    async fn can_map_not_found_error() {
        let error = TodoError::from(TodoServiceError::NotFound("abc".to_string()));

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_body(response).await["error"], "Todo not found");
    }

    #[tokio::test]
    async fn can_hide_storage_details_behind_internal_server_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path");
        let error = TodoError::from(TodoServiceError::from(StoreError::from(io_error)));

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(response).await;
        assert_eq!(
            body["error"],
            "Failed to save todos. Please try again later."
        );
        assert!(!body.to_string().contains("/secret/path"));
    }
}
