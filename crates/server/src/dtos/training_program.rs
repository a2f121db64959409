use chrono::NaiveDateTime;
use database::{entities::training_program, services::training_program::TrainingProgramInput};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrainingProgramResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<training_program::Model> for TrainingProgramResponse {
    fn from(program: training_program::Model) -> Self {
        Self {
            id: program.id,
            name: program.name,
            description: program.description,
            created_at: program.created_at,
            updated_at: program.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrainingProgramRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl From<TrainingProgramRequest> for TrainingProgramInput {
    fn from(request: TrainingProgramRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}
