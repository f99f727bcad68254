//! Error types for the intake service.

use crate::registration::ValidationError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

const METHOD_NOT_ALLOWED_MESSAGE: &str = "Método não permitido";
const DUPLICATE_EMAIL_MESSAGE: &str = "Este email já está cadastrado.";
const NOT_CONFIGURED_MESSAGE: &str = "Banco de dados não configurado.";
const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor. Tente novamente.";

/// Intake error types.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntakeError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            IntakeError::Validation(_) => StatusCode::BAD_REQUEST,
            IntakeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            IntakeError::DuplicateEmail(_) => StatusCode::CONFLICT,
            IntakeError::Configuration(_) | IntakeError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the caller. Server-side causes never leak.
    pub fn public_message(&self) -> String {
        match self {
            IntakeError::Validation(e) => e.to_string(),
            IntakeError::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            IntakeError::DuplicateEmail(_) => DUPLICATE_EMAIL_MESSAGE.to_string(),
            IntakeError::Configuration(_) => NOT_CONFIGURED_MESSAGE.to_string(),
            IntakeError::Storage(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            IntakeError::Validation(e) => debug!(reason = %e, "Registration rejected"),
            IntakeError::MethodNotAllowed => debug!("Method not allowed"),
            IntakeError::DuplicateEmail(email) => warn!(%email, "Duplicate registration attempt"),
            _ => error!(error = %self, "Registration failed"),
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for IntakeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(email) => IntakeError::DuplicateEmail(email),
            StoreError::NotConfigured => IntakeError::Configuration(e.to_string()),
            StoreError::Connection(_) | StoreError::Backend(_) => {
                IntakeError::Storage(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            IntakeError::from(ValidationError::InvalidEmail).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IntakeError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            IntakeError::from(StoreError::DuplicateEmail("a@b.com".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            IntakeError::from(StoreError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = IntakeError::from(StoreError::Connection(
            "server selection timeout at mongodb://user:pass@db".into(),
        ));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.to_string().contains("server selection timeout"));
    }

    #[test]
    fn test_validation_message_is_public() {
        let err = IntakeError::from(ValidationError::InvalidPhone);
        assert_eq!(err.public_message(), "Telefone inválido.");
    }
}
