use crate::{
    auth::Caller,
    dtos::{
        cohort::StudentCohortResponse,
        student::{StudentProfileRequest, StudentResponse},
    },
    error::ApiError,
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{
    entities::cohort,
    services::{cohort::CohortService, student::StudentService},
};
use futures::future::try_join_all;
use models::{
    role::Role,
    visibility::{cohort_started, filter_resource_list},
};

async fn student_cohort(
    state: &AppState,
    cohort: cohort::Model,
) -> Result<StudentCohortResponse, ApiError> {
    let today = state.today();
    let program = CohortService::training_program(&state.db, &cohort).await?;
    let resources = CohortService::resources(&state.db, cohort.id).await?;

    let visible = filter_resource_list(resources, cohort.start_date, Role::Student, today);

    Ok(StudentCohortResponse {
        id: cohort.id,
        training_program: program.into(),
        name: cohort.name,
        start_date: cohort.start_date,
        end_date: cohort.end_date,
        access_link: cohort.access_link,
        resources: visible.into_iter().map(Into::into).collect(),
        can_access: cohort_started(cohort.start_date, today),
    })
}

/// Student profile linked to the authenticated account
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile found", body = StudentResponse),
        (status = 404, description = "StudentProfileNotFound")
    ),
    security(("jwt" = [])),
    tag = "Account"
)]
pub async fn me(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = StudentService::profile(&state.db, &caller.account_id).await?;

    Ok(Json(student.into()))
}

/// Cohorts the authenticated student is actively enrolled in, with the
/// resources available to them today
#[utoipa::path(
    get,
    path = "/my-cohorts",
    responses(
        (status = 200, description = "Enrolled cohorts, latest start date first", body = Vec<StudentCohortResponse>),
        (status = 404, description = "StudentProfileNotFound")
    ),
    security(("jwt" = [])),
    tag = "Account"
)]
pub async fn my_cohorts(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<StudentCohortResponse>>, ApiError> {
    let student = StudentService::profile(&state.db, &caller.account_id).await?;
    let cohorts = CohortService::list_for_student(&state.db, student.id, Default::default()).await?;

    let responses = try_join_all(
        cohorts
            .into_iter()
            .map(|cohort| student_cohort(&state, cohort)),
    )
    .await?;

    Ok(Json(responses))
}

/// Create the student profile for the authenticated account
#[utoipa::path(
    post,
    path = "/registration",
    request_body = StudentProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = StudentResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "ProfileAlreadyExists or EmailAlreadyRegistered")
    ),
    security(("jwt" = [])),
    tag = "Account"
)]
pub async fn register(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<StudentProfileRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    let new_student = request.into_new_student(caller.account_id);
    let student = StudentService::create(&state.db, new_student).await?;

    Ok((StatusCode::CREATED, Json(student.into())))
}
