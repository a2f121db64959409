use crate::{doc::ApiDoc, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod cohort;
pub mod enrollment;
pub mod health;
pub mod resource;
pub mod root;
pub mod student;
pub mod training_program;


/// Routes that need an authenticated caller
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/training-programs",
            get(training_program::list_training_programs)
                .post(training_program::create_training_program),
        )
        .route(
            "/training-programs/{id}",
            get(training_program::get_training_program)
                .put(training_program::update_training_program)
                .delete(training_program::delete_training_program),
        )
        .route(
            "/cohorts",
            get(cohort::list_cohorts).post(cohort::create_cohort),
        )
        .route(
            "/cohorts/{id}",
            get(cohort::get_cohort)
                .put(cohort::update_cohort)
                .delete(cohort::delete_cohort),
        )
        .route(
            "/resources",
            get(resource::list_resources).post(resource::create_resource),
        )
        .route(
            "/resources/{id}",
            get(resource::get_resource)
                .put(resource::update_resource)
                .delete(resource::delete_resource),
        )
        .route("/resources/{id}/download", get(resource::download_resource))
        .route(
            "/students",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/students/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route(
            "/enrollments",
            get(enrollment::list_enrollments).post(enrollment::create_enrollment),
        )
        .route(
            "/enrollments/{id}",
            get(enrollment::get_enrollment)
                .patch(enrollment::update_enrollment)
                .delete(enrollment::delete_enrollment),
        )
        .route("/me", get(account::me))
        .route("/my-cohorts", get(account::my_cohorts))
        .route("/registration", post(account::register))
        .with_state(state)
}

/// Routes reachable without a token
pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
