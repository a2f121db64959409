use models::{
    resource_kind::ResourceKind,
    visibility::{Gate, Gated},
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cohort_id: Uuid,
    pub kind: ResourceKind,
    pub access_previous: bool,
    pub draft: bool,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub file: Option<String>, // Path relative to the media root
    pub url: Option<String>,
    pub order: i32, // Display order, not unique
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cohort::Entity",
        from = "Column::CohortId",
        to = "super::cohort::Column::Id",
        on_delete = "Cascade"
    )]
    Cohort,
}

impl Related<super::cohort::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cohort.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Gated for Model {
    fn gate(&self) -> Gate {
        Gate::new(self.draft, self.access_previous)
    }
}
