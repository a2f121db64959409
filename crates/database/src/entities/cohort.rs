use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scheduled run of a training program
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cohorts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub training_program_id: Uuid,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub access_link: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::training_program::Entity",
        from = "Column::TrainingProgramId",
        to = "super::training_program::Column::Id",
        on_delete = "Cascade"
    )]
    TrainingProgram,
    #[sea_orm(has_many = "super::resource::Entity")]
    Resources,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::training_program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingProgram.def()
    }
}

impl Related<super::resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resources.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

// Many-to-many relationship with students through enrollments
impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::enrollment::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::enrollment::Relation::Cohort.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
