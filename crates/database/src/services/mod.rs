use chrono::{NaiveDateTime, Utc};

pub mod cohort;
pub mod enrollment;
pub mod resource;
pub mod student;
pub mod training_program;

/// Timestamp stored in `created_at`/`updated_at` columns
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Trims a required text field, rejecting blank or overlong values
pub(crate) fn required_text(
    field: &str,
    value: &str,
    max_len: usize,
) -> Result<String, crate::error::ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(crate::error::ServiceError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    if value.chars().count() > max_len {
        return Err(crate::error::ServiceError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_owned())
}
