use crate::{
    auth::Caller,
    dtos::training_program::{TrainingProgramRequest, TrainingProgramResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::training_program::TrainingProgramService;
use uuid::Uuid;

/// List all training programs
#[utoipa::path(
    get,
    path = "/training-programs",
    responses(
        (status = 200, description = "Training programs, newest first", body = Vec<TrainingProgramResponse>),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(("jwt" = [])),
    tag = "Training Programs"
)]
pub async fn list_training_programs(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<TrainingProgramResponse>>, ApiError> {
    let programs = TrainingProgramService::list(&state.db).await?;

    Ok(Json(programs.into_iter().map(Into::into).collect()))
}

/// Get a training program by ID
#[utoipa::path(
    get,
    path = "/training-programs/{id}",
    params(("id" = Uuid, Path, description = "Training program ID")),
    responses(
        (status = 200, description = "Training program found", body = TrainingProgramResponse),
        (status = 404, description = "Training program not found")
    ),
    security(("jwt" = [])),
    tag = "Training Programs"
)]
pub async fn get_training_program(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingProgramResponse>, ApiError> {
    let program = TrainingProgramService::get(&state.db, id).await?;

    Ok(Json(program.into()))
}

/// Create a training program
#[utoipa::path(
    post,
    path = "/training-programs",
    request_body = TrainingProgramRequest,
    responses(
        (status = 201, description = "Training program created", body = TrainingProgramResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator access required")
    ),
    security(("jwt" = [])),
    tag = "Training Programs"
)]
pub async fn create_training_program(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<TrainingProgramRequest>,
) -> Result<(StatusCode, Json<TrainingProgramResponse>), ApiError> {
    caller.require_admin()?;
    let program = TrainingProgramService::create(&state.db, request.into()).await?;

    Ok((StatusCode::CREATED, Json(program.into())))
}

/// Replace a training program
#[utoipa::path(
    put,
    path = "/training-programs/{id}",
    params(("id" = Uuid, Path, description = "Training program ID")),
    request_body = TrainingProgramRequest,
    responses(
        (status = 200, description = "Training program updated", body = TrainingProgramResponse),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Training program not found")
    ),
    security(("jwt" = [])),
    tag = "Training Programs"
)]
pub async fn update_training_program(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<TrainingProgramRequest>,
) -> Result<Json<TrainingProgramResponse>, ApiError> {
    caller.require_admin()?;
    let program = TrainingProgramService::update(&state.db, id, request.into()).await?;

    Ok(Json(program.into()))
}

/// Delete a training program with its cohorts, resources and enrollments
#[utoipa::path(
    delete,
    path = "/training-programs/{id}",
    params(("id" = Uuid, Path, description = "Training program ID")),
    responses(
        (status = 204, description = "Training program deleted"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Training program not found")
    ),
    security(("jwt" = [])),
    tag = "Training Programs"
)]
pub async fn delete_training_program(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    TrainingProgramService::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
