use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors surfaced by the service layer.
///
/// Everything except [`ServiceError::Database`] is an expected outcome the
/// caller should report back as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Training program not found")]
    TrainingProgramNotFound,

    #[error("Cohort not found")]
    CohortNotFound,

    #[error("Resource not found")]
    ResourceNotFound,

    #[error("Student not found")]
    StudentNotFound,

    #[error("Enrollment not found")]
    EnrollmentNotFound,

    /// The authenticated account has no student profile linked to it
    #[error("Student profile not found")]
    StudentProfileNotFound,

    #[error("Student is already enrolled in this cohort")]
    AlreadyEnrolled,

    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    #[error("Account already has a student profile")]
    ProfileAlreadyExists,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// Whether a database error came from a unique index rejecting a row
    pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}
