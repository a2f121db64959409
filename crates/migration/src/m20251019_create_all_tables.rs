use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create training_programs table
        manager
            .create_table(
                Table::create()
                    .table(TrainingPrograms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainingPrograms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TrainingPrograms::Name).string_len(200).not_null())
                    .col(ColumnDef::new(TrainingPrograms::Description).text().not_null())
                    .col(
                        ColumnDef::new(TrainingPrograms::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainingPrograms::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create cohorts table
        manager
            .create_table(
                Table::create()
                    .table(Cohorts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cohorts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cohorts::TrainingProgramId).uuid().not_null())
                    .col(ColumnDef::new(Cohorts::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Cohorts::StartDate).date().not_null())
                    .col(ColumnDef::new(Cohorts::EndDate).date().not_null())
                    .col(ColumnDef::new(Cohorts::AccessLink).string_len(500))
                    .col(ColumnDef::new(Cohorts::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Cohorts::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cohorts-training_program_id")
                            .from(Cohorts::Table, Cohorts::TrainingProgramId)
                            .to(TrainingPrograms::Table, TrainingPrograms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create resources table
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Resources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Resources::CohortId).uuid().not_null())
                    .col(ColumnDef::new(Resources::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Resources::AccessPrevious)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Resources::Draft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Resources::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Resources::Description).text().not_null())
                    .col(ColumnDef::new(Resources::File).string())
                    .col(ColumnDef::new(Resources::Url).string_len(500))
                    .col(
                        ColumnDef::new(Resources::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Resources::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Resources::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-resources-cohort_id")
                            .from(Resources::Table, Resources::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Students::AccountId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Phone).string_len(20))
                    .col(ColumnDef::new(Students::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::CohortId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-cohort_id")
                            .from(Enrollments::Table, Enrollments::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cohorts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TrainingPrograms::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum TrainingPrograms {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Cohorts {
    Table,
    Id,
    TrainingProgramId,
    Name,
    StartDate,
    EndDate,
    AccessLink,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Resources {
    Table,
    Id,
    CohortId,
    Kind,
    AccessPrevious,
    Draft,
    Name,
    Description,
    File,
    Url,
    Order,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Students {
    Table,
    Id,
    AccountId,
    Name,
    Email,
    Phone,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Enrollments {
    Table,
    Id,
    CohortId,
    StudentId,
    EnrolledAt,
    Active,
}
