//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use repository::RepositoryError;
use services::ServiceError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Service layer error.
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Service(err) => service_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn service_error_to_response(err: ServiceError) -> (StatusCode, String) {
    match &err {
        ServiceError::InvalidQuantity(_) | ServiceError::InvalidInput(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        ServiceError::Domain(domain_err) => match domain_err {
            DomainError::OutOfStock(_) => (StatusCode::CONFLICT, err.to_string()),
            DomainError::CurrencyMismatch { .. }
            | DomainError::InvalidOperand { .. }
            | DomainError::Overflow { .. }
            | DomainError::InvalidBatch { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        },
        ServiceError::Repository(RepositoryError::BatchNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        ServiceError::Repository(RepositoryError::DuplicateBatch(_)) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        ServiceError::Repository(_) => {
            tracing::error!(error = %err, "internal server error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}
