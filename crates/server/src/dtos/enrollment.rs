use chrono::NaiveDateTime;
use database::{
    entities::enrollment,
    services::enrollment::{EnrollmentFilter, EnrollmentUpdate, NewEnrollment},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub cohort_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_at: NaiveDateTime,
    pub active: bool,
}

impl From<enrollment::Model> for EnrollmentResponse {
    fn from(enrollment: enrollment::Model) -> Self {
        Self {
            id: enrollment.id,
            cohort_id: enrollment.cohort_id,
            student_id: enrollment.student_id,
            enrolled_at: enrollment.enrolled_at,
            active: enrollment.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollmentRequest {
    pub cohort_id: Uuid,
    pub student_id: Uuid,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<EnrollmentRequest> for NewEnrollment {
    fn from(request: EnrollmentRequest) -> Self {
        Self {
            cohort_id: request.cohort_id,
            student_id: request.student_id,
            active: request.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnrollmentUpdateRequest {
    pub cohort_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub active: Option<bool>,
}

impl From<EnrollmentUpdateRequest> for EnrollmentUpdate {
    fn from(request: EnrollmentUpdateRequest) -> Self {
        Self {
            cohort_id: request.cohort_id,
            student_id: request.student_id,
            active: request.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EnrollmentQueryParams {
    pub cohort: Option<Uuid>,
    pub student: Option<Uuid>,
}

impl From<EnrollmentQueryParams> for EnrollmentFilter {
    fn from(params: EnrollmentQueryParams) -> Self {
        Self {
            cohort: params.cohort,
            student: params.student,
        }
    }
}
