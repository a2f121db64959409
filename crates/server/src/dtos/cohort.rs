use super::{
    resource::{ResourceResponse, StudentResourceResponse},
    training_program::TrainingProgramResponse,
};
use chrono::{NaiveDate, NaiveDateTime};
use database::services::cohort::{CohortFilter, CohortInput};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Cohort with the resources the caller may see
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CohortResponse {
    pub id: Uuid,
    pub training_program_id: Uuid,
    pub training_program_name: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub access_link: Option<String>,
    pub resources: Vec<ResourceResponse>,
    /// Number of active enrollments
    pub total_students: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A cohort from the enrolled student's point of view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentCohortResponse {
    pub id: Uuid,
    pub training_program: TrainingProgramResponse,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub access_link: Option<String>,
    pub resources: Vec<StudentResourceResponse>,
    /// Whether the cohort has started
    pub can_access: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CohortRequest {
    pub training_program_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub access_link: Option<String>,
}

impl From<CohortRequest> for CohortInput {
    fn from(request: CohortRequest) -> Self {
        Self {
            training_program_id: request.training_program_id,
            name: request.name,
            start_date: request.start_date,
            end_date: request.end_date,
            access_link: request.access_link,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CohortQueryParams {
    pub training_program: Option<Uuid>,
    /// Case-insensitive match on the training program name
    pub training_program_name: Option<String>,
    /// Earliest start date, inclusive
    pub start_after: Option<NaiveDate>,
    /// Latest start date, inclusive
    pub start_before: Option<NaiveDate>,
}

impl From<CohortQueryParams> for CohortFilter {
    fn from(params: CohortQueryParams) -> Self {
        Self {
            training_program: params.training_program,
            training_program_name: params.training_program_name,
            start_after: params.start_after,
            start_before: params.start_before,
        }
    }
}
