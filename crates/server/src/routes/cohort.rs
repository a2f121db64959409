use crate::{
    auth::Caller,
    dtos::cohort::{CohortQueryParams, CohortRequest, CohortResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::{entities::cohort, error::ServiceError, services::cohort::CohortService};
use futures::future::try_join_all;
use models::{
    role::{Requester, Role},
    visibility::filter_resource_list,
};
use uuid::Uuid;

/// Builds the cohort view for `role`, keeping only the resources it may see
pub(crate) async fn cohort_response(
    state: &AppState,
    cohort: cohort::Model,
    role: Role,
) -> Result<CohortResponse, ApiError> {
    let program = CohortService::training_program(&state.db, &cohort).await?;
    let resources = CohortService::resources(&state.db, cohort.id).await?;
    let total_students = CohortService::active_student_count(&state.db, cohort.id).await?;

    let visible = filter_resource_list(resources, cohort.start_date, role, state.today());

    Ok(CohortResponse {
        id: cohort.id,
        training_program_id: program.id,
        training_program_name: program.name,
        name: cohort.name,
        start_date: cohort.start_date,
        end_date: cohort.end_date,
        access_link: cohort.access_link,
        resources: visible.into_iter().map(Into::into).collect(),
        total_students,
        created_at: cohort.created_at,
        updated_at: cohort.updated_at,
    })
}

/// List cohorts; students only see cohorts they are actively enrolled in
#[utoipa::path(
    get,
    path = "/cohorts",
    params(CohortQueryParams),
    responses(
        (status = 200, description = "Cohorts, latest start date first", body = Vec<CohortResponse>),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(("jwt" = [])),
    tag = "Cohorts"
)]
pub async fn list_cohorts(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<CohortQueryParams>,
) -> Result<Json<Vec<CohortResponse>>, ApiError> {
    let cohorts = match caller.role {
        Role::Admin => CohortService::list(&state.db, params.into()).await?,
        // Accounts without a student profile simply have no cohorts
        Role::Student => match caller.requester(&state.db).await {
            Ok(Requester::Student { student_id }) => {
                CohortService::list_for_student(&state.db, student_id, params.into()).await?
            }
            Ok(Requester::Admin) => Vec::new(),
            Err(ApiError::Service(ServiceError::StudentProfileNotFound)) => Vec::new(),
            Err(err) => return Err(err),
        },
    };

    let responses = try_join_all(
        cohorts
            .into_iter()
            .map(|cohort| cohort_response(&state, cohort, caller.role)),
    )
    .await?;

    Ok(Json(responses))
}

/// Get a cohort by ID
#[utoipa::path(
    get,
    path = "/cohorts/{id}",
    params(("id" = Uuid, Path, description = "Cohort ID")),
    responses(
        (status = 200, description = "Cohort found", body = CohortResponse),
        (status = 404, description = "Cohort not found or not visible to the caller")
    ),
    security(("jwt" = [])),
    tag = "Cohorts"
)]
pub async fn get_cohort(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<CohortResponse>, ApiError> {
    let cohort = match caller.requester(&state.db).await {
        Ok(Requester::Admin) => CohortService::get(&state.db, id).await?,
        Ok(Requester::Student { student_id }) => {
            CohortService::get_for_student(&state.db, id, student_id).await?
        }
        Err(ApiError::Service(ServiceError::StudentProfileNotFound)) => {
            return Err(ServiceError::CohortNotFound.into());
        }
        Err(err) => return Err(err),
    };

    Ok(Json(cohort_response(&state, cohort, caller.role).await?))
}

/// Create a cohort
#[utoipa::path(
    post,
    path = "/cohorts",
    request_body = CohortRequest,
    responses(
        (status = 201, description = "Cohort created", body = CohortResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Training program not found")
    ),
    security(("jwt" = [])),
    tag = "Cohorts"
)]
pub async fn create_cohort(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CohortRequest>,
) -> Result<(StatusCode, Json<CohortResponse>), ApiError> {
    caller.require_admin()?;
    let cohort = CohortService::create(&state.db, request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(cohort_response(&state, cohort, caller.role).await?),
    ))
}

/// Replace a cohort
#[utoipa::path(
    put,
    path = "/cohorts/{id}",
    params(("id" = Uuid, Path, description = "Cohort ID")),
    request_body = CohortRequest,
    responses(
        (status = 200, description = "Cohort updated", body = CohortResponse),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Cohort or training program not found")
    ),
    security(("jwt" = [])),
    tag = "Cohorts"
)]
pub async fn update_cohort(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<CohortRequest>,
) -> Result<Json<CohortResponse>, ApiError> {
    caller.require_admin()?;
    let cohort = CohortService::update(&state.db, id, request.into()).await?;

    Ok(Json(cohort_response(&state, cohort, caller.role).await?))
}

/// Delete a cohort with its resources and enrollments
#[utoipa::path(
    delete,
    path = "/cohorts/{id}",
    params(("id" = Uuid, Path, description = "Cohort ID")),
    responses(
        (status = 204, description = "Cohort deleted"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Cohort not found")
    ),
    security(("jwt" = [])),
    tag = "Cohorts"
)]
pub async fn delete_cohort(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    CohortService::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
