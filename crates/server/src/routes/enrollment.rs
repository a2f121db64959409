use crate::{
    auth::Caller,
    dtos::enrollment::{
        EnrollmentQueryParams, EnrollmentRequest, EnrollmentResponse, EnrollmentUpdateRequest,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::enrollment::EnrollmentService;
use uuid::Uuid;

/// List enrollments
#[utoipa::path(
    get,
    path = "/enrollments",
    params(EnrollmentQueryParams),
    responses(
        (status = 200, description = "Enrollments, most recent first", body = Vec<EnrollmentResponse>),
        (status = 403, description = "Administrator access required")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<EnrollmentQueryParams>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    caller.require_admin()?;
    let enrollments = EnrollmentService::list(&state.db, params.into()).await?;

    Ok(Json(enrollments.into_iter().map(Into::into).collect()))
}

/// Get an enrollment by ID
#[utoipa::path(
    get,
    path = "/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment found", body = EnrollmentResponse),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Enrollment not found")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn get_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    caller.require_admin()?;
    let enrollment = EnrollmentService::get(&state.db, id).await?;

    Ok(Json(enrollment.into()))
}

/// Enroll a student in a cohort
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = EnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentResponse),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Cohort or student not found"),
        (status = 409, description = "AlreadyEnrolled")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<EnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    caller.require_admin()?;
    let enrollment = EnrollmentService::create(&state.db, request.into()).await?;

    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

/// Change an enrollment's cohort, student or active flag
#[utoipa::path(
    patch,
    path = "/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = EnrollmentUpdateRequest,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentResponse),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Enrollment, cohort or student not found"),
        (status = 409, description = "AlreadyEnrolled")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn update_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<EnrollmentUpdateRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    caller.require_admin()?;
    let enrollment = EnrollmentService::update(&state.db, id, request.into()).await?;

    Ok(Json(enrollment.into()))
}

/// Delete an enrollment
#[utoipa::path(
    delete,
    path = "/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment deleted"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Enrollment not found")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    EnrollmentService::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
