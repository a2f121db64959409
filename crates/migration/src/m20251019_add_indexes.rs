use sea_orm_migration::prelude::*;

use crate::m20251019_create_all_tables::{Cohorts, Enrollments, Resources};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A student can be enrolled in a cohort at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_cohort_student")
                    .table(Enrollments::Table)
                    .col(Enrollments::CohortId)
                    .col(Enrollments::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        // Index on cohorts.training_program_id for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_cohorts_training_program_id")
                    .table(Cohorts::Table)
                    .col(Cohorts::TrainingProgramId)
                    .to_owned(),
            )
            .await?;

        // Resources are always listed per cohort in display order
        manager
            .create_index(
                Index::create()
                    .name("idx_resources_cohort_order")
                    .table(Resources::Table)
                    .col(Resources::CohortId)
                    .col(Resources::Order)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_resources_cohort_order")
                    .table(Resources::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_cohorts_training_program_id")
                    .table(Cohorts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_cohort_student")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
