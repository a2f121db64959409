use crate::{
    auth::Caller,
    dtos::student::{NewStudentRequest, StudentProfileRequest, StudentResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::{entities::student, error::ServiceError, services::student::StudentService};
use uuid::Uuid;

/// Loads a student the caller may manage: admins reach everyone, students only
/// their own profile. Other profiles are reported as missing.
async fn manageable_student(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> Result<student::Model, ApiError> {
    let student = StudentService::get(&state.db, id).await?;

    if caller.is_admin() || student.account_id == caller.account_id {
        Ok(student)
    } else {
        Err(ServiceError::StudentNotFound.into())
    }
}

/// List all students
#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "Students sorted by name", body = Vec<StudentResponse>),
        (status = 403, description = "Administrator access required")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    caller.require_admin()?;
    let students = StudentService::list(&state.db).await?;

    Ok(Json(students.into_iter().map(Into::into).collect()))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found or not the caller's own profile")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = manageable_student(&state, &caller, id).await?;

    Ok(Json(student.into()))
}

/// Create a student profile for an existing account
#[utoipa::path(
    post,
    path = "/students",
    request_body = NewStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator access required"),
        (status = 409, description = "Email or account already registered")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    caller.require_admin()?;
    let student = StudentService::create(&state.db, request.into()).await?;

    Ok((StatusCode::CREATED, Json(student.into())))
}

/// Update a student's profile
#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = StudentProfileRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Student not found or not the caller's own profile"),
        (status = 409, description = "Email already registered")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<StudentProfileRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = manageable_student(&state, &caller, id).await?;
    let updated = StudentService::update(&state.db, student.id, request.into()).await?;

    Ok(Json(updated.into()))
}

/// Delete a student and their enrollments
#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    StudentService::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
