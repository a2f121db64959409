use super::{now, required_text};
use crate::{entities::training_program, error::ServiceError};
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder,
};
use uuid::Uuid;

/// Fields an admin provides when creating or replacing a training program
#[derive(Debug, Clone)]
pub struct TrainingProgramInput {
    pub name: String,
    pub description: String,
}

pub struct TrainingProgramService;

impl TrainingProgramService {
    /// All training programs, newest first
    pub async fn list(
        db: &DatabaseConnection,
    ) -> Result<Vec<training_program::Model>, ServiceError> {
        let programs = training_program::Entity::find()
            .order_by_desc(training_program::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(programs)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<training_program::Model, ServiceError> {
        training_program::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::TrainingProgramNotFound)
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: TrainingProgramInput,
    ) -> Result<training_program::Model, ServiceError> {
        let timestamp = now();
        let program = training_program::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(required_text("name", &input.name, 200)?),
            description: Set(input.description),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        info!("Created training program {} ({})", program.name, program.id);
        Ok(program)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: TrainingProgramInput,
    ) -> Result<training_program::Model, ServiceError> {
        let name = required_text("name", &input.name, 200)?;
        let mut program: training_program::ActiveModel = Self::get(db, id).await?.into();

        program.name = Set(name);
        program.description = Set(input.description);
        program.updated_at = Set(now());

        Ok(program.update(db).await?)
    }

    /// Deletes a training program together with its cohorts, their resources
    /// and enrollments
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let program = Self::get(db, id).await?;
        program.delete(db).await?;

        info!("Deleted training program {id} and everything under it");
        Ok(())
    }
}
