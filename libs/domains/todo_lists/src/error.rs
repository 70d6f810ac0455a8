use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoListError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Todo list '{0}' already exists")]
    Duplicate(String),

    #[error("Failed to write todo list to the vector store: {0}")]
    StoreWrite(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Another change to this todo list is still in progress")]
    Busy,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TodoListResult<T> = Result<T, TodoListError>;

impl TodoListError {
    pub(crate) fn list_not_found() -> Self {
        TodoListError::NotFound("Todo list not found".to_string())
    }
}

impl From<validator::ValidationErrors> for TodoListError {
    fn from(err: validator::ValidationErrors) -> Self {
        TodoListError::Validation(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for TodoListError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        TodoListError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for TodoListError {
    fn from(err: reqwest::Error) -> Self {
        TodoListError::Embedding(err.to_string())
    }
}

impl From<serde_json::Error> for TodoListError {
    fn from(err: serde_json::Error) -> Self {
        TodoListError::Internal(format!("JSON error: {}", err))
    }
}

impl From<core_config::ConfigError> for TodoListError {
    fn from(err: core_config::ConfigError) -> Self {
        TodoListError::Config(err.to_string())
    }
}

/// Convert TodoListError to AppError for standardized HTTP error responses
impl From<TodoListError> for AppError {
    fn from(err: TodoListError) -> Self {
        match err {
            TodoListError::Validation(msg) => AppError::BadRequest(msg),
            TodoListError::NotFound(msg) => AppError::NotFound(msg),
            err @ TodoListError::Duplicate(_) => AppError::Conflict(err.to_string()),
            err @ TodoListError::Busy => AppError::Busy(err.to_string()),
            err @ (TodoListError::Embedding(_)
            | TodoListError::StoreWrite(_)
            | TodoListError::Store(_)) => AppError::BadGateway(err.to_string()),
            err @ (TodoListError::PasswordHash(_)
            | TodoListError::Config(_)
            | TodoListError::Internal(_)) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl IntoResponse for TodoListError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
