use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use infrastructure::StoreError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::ErrorBody;

/// ストア操作の種類（エラーメッセージの切り替えに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOperation::Fetch => "Could not fetch the todo collection",
            StoreOperation::Create => "Could not create the todo",
            StoreOperation::Update => "Could not update the todo",
            StoreOperation::Delete => "Could not delete the todo",
        })
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request payload")]
    InvalidPayload(String),

    #[error("Title is required")]
    TitleRequired,

    #[error("Completed is required")]
    CompletedRequired,

    #[error("Invalid id")]
    InvalidId(String),

    #[error("{op}")]
    Store {
        op: StoreOperation,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(op: StoreOperation) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Store { op, source }
    }

    /// ストア起因のエラーも含めて 400 で返す
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn detail(&self) -> Option<String> {
        match self {
            ApiError::InvalidPayload(detail) => Some(detail.clone()),
            ApiError::InvalidId(raw) => Some(format!("{raw:?} is not a valid todo id")),
            ApiError::Store { source, .. } => Some(source.to_string()),
            ApiError::TitleRequired | ApiError::CompletedRequired => None,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidTodoId(raw) => ApiError::InvalidId(raw),
            DomainError::TitleRequired => ApiError::TitleRequired,
            DomainError::CompletedRequired => ApiError::CompletedRequired,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store { op, source } => {
                error!(operation = ?op, error = %source, "store operation failed");
            }
            other => debug!(error = %other, "rejected client input"),
        }

        let body = ErrorBody {
            message: self.to_string(),
            error: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_store_messages_per_operation() {
        let err = ApiError::store(StoreOperation::Delete)(StoreError::Timeout(Duration::from_secs(5)));

        assert_eq!(err.to_string(), "Could not delete the todo");
        assert_eq!(err.detail().as_deref(), Some("Store operation timed out after 5s"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_domain_errors_map_to_client_errors() {
        assert!(matches!(
            ApiError::from(DomainError::InvalidTodoId("x".into())),
            ApiError::InvalidId(_)
        ));
        assert!(matches!(ApiError::from(DomainError::TitleRequired), ApiError::TitleRequired));
        assert_eq!(ApiError::TitleRequired.detail(), None);
    }
}
