use crate::routes::{
    account, cohort, enrollment, health, resource, root, student, training_program,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        training_program::list_training_programs,
        training_program::get_training_program,
        training_program::create_training_program,
        training_program::update_training_program,
        training_program::delete_training_program,
        cohort::list_cohorts,
        cohort::get_cohort,
        cohort::create_cohort,
        cohort::update_cohort,
        cohort::delete_cohort,
        resource::list_resources,
        resource::get_resource,
        resource::create_resource,
        resource::update_resource,
        resource::delete_resource,
        resource::download_resource,
        student::list_students,
        student::get_student,
        student::create_student,
        student::update_student,
        student::delete_student,
        enrollment::list_enrollments,
        enrollment::get_enrollment,
        enrollment::create_enrollment,
        enrollment::update_enrollment,
        enrollment::delete_enrollment,
        account::me,
        account::my_cohorts,
        account::register
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Training Programs", description = "Training program catalog"),
        (name = "Cohorts", description = "Scheduled offerings of a training program"),
        (name = "Resources", description = "Cohort materials and gated downloads"),
        (name = "Students", description = "Student profiles"),
        (name = "Enrollments", description = "Student membership in cohorts"),
        (name = "Account", description = "The authenticated student's own data"),
    ),
    info(
        title = "Training API",
        version = "1.0.0",
        description = "Training programs, cohorts and gated learning resources",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_document_lists_download_and_security() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/resources/{id}/download"));
        assert!(doc.paths.paths.contains_key("/my-cohorts"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("jwt"));
    }
}
