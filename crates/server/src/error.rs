use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use models::access::Denial;
use serde_json::json;
use thiserror::Error;

/// Every way a request can fail, each with its own status and error kind
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Denied(#[from] Denial),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Missing or invalid credentials")]
    Unauthorized,

    #[error("Administrator access required")]
    Forbidden,

    /// A granted file reference whose bytes are gone from storage
    #[error("File not found")]
    FileMissing,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Denied(denial) => match denial {
                Denial::NotEnrolled => (StatusCode::FORBIDDEN, "NotEnrolled"),
                Denial::NotAvailable => (StatusCode::FORBIDDEN, "NotAvailable"),
                Denial::NotYetAvailable => (StatusCode::FORBIDDEN, "NotYetAvailable"),
                Denial::NoFileAttached => (StatusCode::NOT_FOUND, "NoFileAttached"),
            },
            Self::Service(err) => match err {
                ServiceError::TrainingProgramNotFound => {
                    (StatusCode::NOT_FOUND, "TrainingProgramNotFound")
                }
                ServiceError::CohortNotFound => (StatusCode::NOT_FOUND, "CohortNotFound"),
                ServiceError::ResourceNotFound => (StatusCode::NOT_FOUND, "ResourceNotFound"),
                ServiceError::StudentNotFound => (StatusCode::NOT_FOUND, "StudentNotFound"),
                ServiceError::EnrollmentNotFound => (StatusCode::NOT_FOUND, "EnrollmentNotFound"),
                ServiceError::StudentProfileNotFound => {
                    (StatusCode::NOT_FOUND, "StudentProfileNotFound")
                }
                ServiceError::AlreadyEnrolled => (StatusCode::CONFLICT, "AlreadyEnrolled"),
                ServiceError::EmailAlreadyRegistered => {
                    (StatusCode::CONFLICT, "EmailAlreadyRegistered")
                }
                ServiceError::ProfileAlreadyExists => {
                    (StatusCode::CONFLICT, "ProfileAlreadyExists")
                }
                ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation"),
                ServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal"),
            },
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            Self::FileMissing => (StatusCode::NOT_FOUND, "FileMissing"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        // Storage faults are not shown to the caller
        let message = match &self {
            Self::Service(ServiceError::Database(err)) => {
                error!("Database error while handling request: {err}");
                "Internal server error".to_owned()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}
