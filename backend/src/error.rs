//! Error type shared by the HTTP handlers.
//!
//! Client mistakes carry their message to the response body. Server-side
//! failures are logged in full and answered with the endpoint's generic
//! message, set through `ServiceError::context`.

use crate::document::render::RenderError;
use crate::document::substitute::SubstituteError;
use crate::storage::StorageError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::requests::{ErrorResponse, FieldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed request body or query.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidUpload(String),

    #[error("Invalid form data")]
    InvalidFormData(Vec<FieldError>),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        source: InternalError,
    },
}

/// Server-side failures. Never shown to clients.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Substitute(#[from] SubstituteError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("rendering did not finish in time")]
    Timeout,

    #[error("background task failed: {0}")]
    Join(String),
}

impl ServiceError {
    pub fn internal(message: &'static str, source: impl Into<InternalError>) -> Self {
        ServiceError::Internal {
            message,
            source: source.into(),
        }
    }
}

/// Attaches an endpoint's public failure message to internal errors.
pub trait Context<T> {
    fn context(self, message: &'static str) -> Result<T, ServiceError>;
}

impl<T, E: Into<InternalError>> Context<T> for Result<T, E> {
    fn context(self, message: &'static str) -> Result<T, ServiceError> {
        self.map_err(|e| ServiceError::internal(message, e))
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_)
            | ServiceError::InvalidUpload(_)
            | ServiceError::InvalidFormData(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::InvalidFormData(errors) => ErrorResponse {
                message: self.to_string(),
                errors: errors.clone(),
            },
            ServiceError::Internal { message, source } => {
                log::error!("{}: {}", message, source);
                ErrorResponse {
                    message: message.to_string(),
                    errors: Vec::new(),
                }
            }
            _ => ErrorResponse {
                message: self.to_string(),
                errors: Vec::new(),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: ServiceError) -> (StatusCode, ErrorResponse) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn form_errors_are_listed() {
        let err = ServiceError::InvalidFormData(vec![FieldError {
            field: "total".to_string(),
            message: "must be a scalar value".to_string(),
        }]);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Invalid form data");
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].field, "total");
    }

    #[actix_web::test]
    async fn internal_details_stay_out_of_the_body() {
        let io = std::io::Error::other("disk on fire");
        let err: Result<(), _> = Err(io);
        let (status, body) = body_of(err.context("Failed to generate PDF").unwrap_err()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Failed to generate PDF");
        assert!(body.errors.is_empty());
    }

    #[actix_web::test]
    async fn not_found_uses_its_message() {
        let (status, body) = body_of(ServiceError::NotFound("Template not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Template not found");
    }
}
