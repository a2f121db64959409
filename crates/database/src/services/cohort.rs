use super::{now, required_text};
use crate::{
    entities::{cohort, enrollment, resource, training_program},
    error::ServiceError,
};
use chrono::NaiveDate;
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, Query},
};
use uuid::Uuid;

/// Optional filters for cohort listings
#[derive(Debug, Clone, Default)]
pub struct CohortFilter {
    pub training_program: Option<Uuid>,
    /// Case-insensitive substring of the training program name
    pub training_program_name: Option<String>,
    pub start_after: Option<NaiveDate>,
    pub start_before: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CohortInput {
    pub training_program_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub access_link: Option<String>,
}

pub struct CohortService;

impl CohortService {
    fn filter_condition(filter: CohortFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(program_id) = filter.training_program {
            condition = condition.add(cohort::Column::TrainingProgramId.eq(program_id));
        }

        if let Some(name) = filter.training_program_name
            && !name.trim().is_empty()
        {
            let needle = name.trim().to_lowercase();
            let matching_programs = Query::select()
                .column(training_program::Column::Id)
                .from(training_program::Entity)
                .and_where(
                    Expr::expr(Func::lower(Expr::col(training_program::Column::Name)))
                        .like(format!("%{needle}%")),
                )
                .to_owned();
            condition =
                condition.add(cohort::Column::TrainingProgramId.in_subquery(matching_programs));
        }

        if let Some(after) = filter.start_after {
            condition = condition.add(cohort::Column::StartDate.gte(after));
        }

        if let Some(before) = filter.start_before {
            condition = condition.add(cohort::Column::StartDate.lte(before));
        }

        condition
    }

    /// Ids of the cohorts a student is actively enrolled in
    async fn active_cohort_ids(
        db: &DatabaseConnection,
        student_id: Uuid,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let ids = enrollment::Entity::find()
            .select_only()
            .column(enrollment::Column::CohortId)
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::Active.eq(true))
            .into_tuple::<Uuid>()
            .all(db)
            .await?;

        Ok(ids)
    }

    /// Cohorts matching `filter`, latest start date first
    pub async fn list(
        db: &DatabaseConnection,
        filter: CohortFilter,
    ) -> Result<Vec<cohort::Model>, ServiceError> {
        let condition = Self::filter_condition(filter);
        let cohorts = cohort::Entity::find()
            .filter(condition)
            .order_by_desc(cohort::Column::StartDate)
            .all(db)
            .await?;

        Ok(cohorts)
    }

    /// Like [`CohortService::list`], restricted to cohorts the student is
    /// actively enrolled in
    pub async fn list_for_student(
        db: &DatabaseConnection,
        student_id: Uuid,
        filter: CohortFilter,
    ) -> Result<Vec<cohort::Model>, ServiceError> {
        let cohort_ids = Self::active_cohort_ids(db, student_id).await?;
        let condition = Self::filter_condition(filter).add(cohort::Column::Id.is_in(cohort_ids));

        let cohorts = cohort::Entity::find()
            .filter(condition)
            .order_by_desc(cohort::Column::StartDate)
            .all(db)
            .await?;

        Ok(cohorts)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<cohort::Model, ServiceError> {
        cohort::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::CohortNotFound)
    }

    /// A cohort the student is actively enrolled in; any other cohort is
    /// reported as not found
    pub async fn get_for_student(
        db: &DatabaseConnection,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<cohort::Model, ServiceError> {
        let enrolled = enrollment::Entity::find()
            .filter(enrollment::Column::CohortId.eq(id))
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::Active.eq(true))
            .count(db)
            .await?
            > 0;

        if !enrolled {
            return Err(ServiceError::CohortNotFound);
        }

        Self::get(db, id).await
    }

    /// Training program a cohort belongs to
    pub async fn training_program(
        db: &DatabaseConnection,
        cohort: &cohort::Model,
    ) -> Result<training_program::Model, ServiceError> {
        cohort
            .find_related(training_program::Entity)
            .one(db)
            .await?
            .ok_or(ServiceError::TrainingProgramNotFound)
    }

    /// Every resource of a cohort in display order: `order` ascending, newest
    /// first among equal positions
    pub async fn resources(
        db: &DatabaseConnection,
        cohort_id: Uuid,
    ) -> Result<Vec<resource::Model>, ServiceError> {
        let resources = resource::Entity::find()
            .filter(resource::Column::CohortId.eq(cohort_id))
            .order_by_asc(resource::Column::Order)
            .order_by_desc(resource::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(resources)
    }

    /// Number of active enrollments in a cohort
    pub async fn active_student_count(
        db: &DatabaseConnection,
        cohort_id: Uuid,
    ) -> Result<u64, ServiceError> {
        let count = enrollment::Entity::find()
            .filter(enrollment::Column::CohortId.eq(cohort_id))
            .filter(enrollment::Column::Active.eq(true))
            .count(db)
            .await?;

        Ok(count)
    }

    fn validate(input: &CohortInput) -> Result<String, ServiceError> {
        if input.end_date < input.start_date {
            return Err(ServiceError::Validation(
                "end_date must not be before start_date".to_owned(),
            ));
        }

        required_text("name", &input.name, 200)
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: CohortInput,
    ) -> Result<cohort::Model, ServiceError> {
        let name = Self::validate(&input)?;
        super::training_program::TrainingProgramService::get(db, input.training_program_id)
            .await?;

        let timestamp = now();
        let cohort = cohort::ActiveModel {
            id: Set(Uuid::new_v4()),
            training_program_id: Set(input.training_program_id),
            name: Set(name),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            access_link: Set(input.access_link),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        info!("Created cohort {} ({})", cohort.name, cohort.id);
        Ok(cohort)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: CohortInput,
    ) -> Result<cohort::Model, ServiceError> {
        let name = Self::validate(&input)?;
        let existing = Self::get(db, id).await?;

        if existing.training_program_id != input.training_program_id {
            super::training_program::TrainingProgramService::get(db, input.training_program_id)
                .await?;
        }

        let mut cohort: cohort::ActiveModel = existing.into();
        cohort.training_program_id = Set(input.training_program_id);
        cohort.name = Set(name);
        cohort.start_date = Set(input.start_date);
        cohort.end_date = Set(input.end_date);
        cohort.access_link = Set(input.access_link);
        cohort.updated_at = Set(now());

        Ok(cohort.update(db).await?)
    }

    /// Deletes a cohort together with its resources and enrollments
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let cohort = Self::get(db, id).await?;
        cohort.delete(db).await?;

        info!("Deleted cohort {id}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        services::enrollment::{EnrollmentService, NewEnrollment},
        test_support::*,
    };

    async fn enroll(db: &DatabaseConnection, cohort_id: Uuid, student_id: Uuid, active: bool) {
        EnrollmentService::create(
            db,
            NewEnrollment {
                cohort_id,
                student_id,
                active,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        let rust = seed_program(&db, "Advanced Rust").await;
        let go = seed_program(&db, "Go in Practice").await;
        let march = seed_cohort(&db, rust.id, "March", date(2025, 3, 1)).await;
        let june = seed_cohort(&db, rust.id, "June", date(2025, 6, 1)).await;
        let go_april = seed_cohort(&db, go.id, "April", date(2025, 4, 1)).await;

        let all = CohortService::list(&db, CohortFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![june.id, go_april.id, march.id]);

        let by_program = CohortService::list(
            &db,
            CohortFilter {
                training_program: Some(rust.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_program.len(), 2);

        let by_name = CohortService::list(
            &db,
            CohortFilter {
                training_program_name: Some("rUsT".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(by_name.iter().all(|c| c.training_program_id == rust.id));
        assert_eq!(by_name.len(), 2);

        let window = CohortService::list(
            &db,
            CohortFilter {
                start_after: Some(date(2025, 3, 2)),
                start_before: Some(date(2025, 6, 1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<_> = window.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![june.id, go_april.id]);

        let nothing = CohortService::list(
            &db,
            CohortFilter {
                training_program_name: Some("python".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(nothing.is_empty());

        let mid_word = CohortService::list(
            &db,
            CohortFilter {
                training_program_name: Some(" PRACT ".to_owned()),
                start_after: Some(date(2025, 1, 1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<_> = mid_word.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![go_april.id]);
    }

    #[tokio::test]
    async fn test_student_listing_by_program_name() {
        let db = test_db().await;
        let rust = seed_program(&db, "Advanced Rust").await;
        let go = seed_program(&db, "Go in Practice").await;
        let rust_cohort = seed_cohort(&db, rust.id, "March", date(2025, 3, 1)).await;
        let go_cohort = seed_cohort(&db, go.id, "April", date(2025, 4, 1)).await;
        let student = seed_student(&db, "bob").await;
        enroll(&db, rust_cohort.id, student.id, true).await;
        enroll(&db, go_cohort.id, student.id, true).await;

        let cohorts = CohortService::list_for_student(
            &db,
            student.id,
            CohortFilter {
                training_program_name: Some("rust".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<_> = cohorts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![rust_cohort.id]);
    }

    #[tokio::test]
    async fn test_student_scoping() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let active = seed_cohort(&db, program.id, "Active", date(2025, 3, 1)).await;
        let inactive = seed_cohort(&db, program.id, "Inactive", date(2025, 4, 1)).await;
        let other = seed_cohort(&db, program.id, "Other", date(2025, 5, 1)).await;
        let student = seed_student(&db, "bob").await;
        enroll(&db, active.id, student.id, true).await;
        enroll(&db, inactive.id, student.id, false).await;

        let cohorts = CohortService::list_for_student(&db, student.id, CohortFilter::default())
            .await
            .unwrap();
        assert_eq!(cohorts.len(), 1);
        assert_eq!(cohorts[0].id, active.id);

        assert!(
            CohortService::get_for_student(&db, active.id, student.id)
                .await
                .is_ok()
        );
        for hidden in [inactive.id, other.id] {
            assert!(matches!(
                CohortService::get_for_student(&db, hidden, student.id).await,
                Err(ServiceError::CohortNotFound)
            ));
        }

        assert_eq!(
            CohortService::active_student_count(&db, active.id).await.unwrap(),
            1
        );
        assert_eq!(
            CohortService::active_student_count(&db, inactive.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_resources_in_display_order() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let cohort = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;
        let second = seed_resource(&db, cohort.id, "second", 2, false, false).await;
        let first = seed_resource(&db, cohort.id, "first", 1, false, false).await;
        let zero = seed_resource(&db, cohort.id, "zero", 0, true, false).await;

        let names: Vec<_> = CohortService::resources(&db, cohort.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(names, vec![zero.id, first.id, second.id]);
    }

    #[tokio::test]
    async fn test_create_validates() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;

        let backwards = CohortService::create(
            &db,
            CohortInput {
                training_program_id: program.id,
                name: "Backwards".to_owned(),
                start_date: date(2025, 3, 1),
                end_date: date(2025, 2, 1),
                access_link: None,
            },
        )
        .await;
        assert!(matches!(backwards, Err(ServiceError::Validation(_))));

        let orphan = CohortService::create(
            &db,
            CohortInput {
                training_program_id: Uuid::new_v4(),
                name: "Orphan".to_owned(),
                start_date: date(2025, 3, 1),
                end_date: date(2025, 4, 1),
                access_link: None,
            },
        )
        .await;
        assert!(matches!(orphan, Err(ServiceError::TrainingProgramNotFound)));

        let cohort = CohortService::create(
            &db,
            CohortInput {
                training_program_id: program.id,
                name: "2025.1".to_owned(),
                start_date: date(2025, 3, 1),
                end_date: date(2025, 4, 1),
                access_link: Some("https://meet.example.com/rust".to_owned()),
            },
        )
        .await
        .unwrap();
        let parent = CohortService::training_program(&db, &cohort).await.unwrap();
        assert_eq!(parent.id, program.id);
    }
}
