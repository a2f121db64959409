use super::now;
use crate::{
    entities::{cohort, enrollment, student},
    error::ServiceError,
};
use log::{info, warn};
use models::access::EnrollmentSnapshot;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

/// Optional filters for enrollment listings
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    pub cohort: Option<Uuid>,
    pub student: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub cohort_id: Uuid,
    pub student_id: Uuid,
    pub active: bool,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct EnrollmentUpdate {
    pub cohort_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub active: Option<bool>,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrollments matching `filter`, most recent first
    pub async fn list(
        db: &DatabaseConnection,
        filter: EnrollmentFilter,
    ) -> Result<Vec<enrollment::Model>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(cohort_id) = filter.cohort {
            condition = condition.add(enrollment::Column::CohortId.eq(cohort_id));
        }
        if let Some(student_id) = filter.student {
            condition = condition.add(enrollment::Column::StudentId.eq(student_id));
        }

        let enrollments = enrollment::Entity::find()
            .filter(condition)
            .order_by_desc(enrollment::Column::EnrolledAt)
            .all(db)
            .await?;

        Ok(enrollments)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<enrollment::Model, ServiceError> {
        enrollment::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::EnrollmentNotFound)
    }

    /// Enrollment rows of one student in one cohort, active or not
    pub async fn snapshots_for(
        db: &DatabaseConnection,
        student_id: Uuid,
        cohort_id: Uuid,
    ) -> Result<Vec<EnrollmentSnapshot>, ServiceError> {
        let snapshots = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::CohortId.eq(cohort_id))
            .all(db)
            .await?
            .iter()
            .map(EnrollmentSnapshot::from)
            .collect();

        Ok(snapshots)
    }

    /// Checks both ends of the pair exist and that no other enrollment holds it
    async fn check_pair<C: ConnectionTrait>(
        conn: &C,
        cohort_id: Uuid,
        student_id: Uuid,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if cohort::Entity::find_by_id(cohort_id).one(conn).await?.is_none() {
            return Err(ServiceError::CohortNotFound);
        }
        if student::Entity::find_by_id(student_id).one(conn).await?.is_none() {
            return Err(ServiceError::StudentNotFound);
        }

        let mut existing = enrollment::Entity::find()
            .filter(enrollment::Column::CohortId.eq(cohort_id))
            .filter(enrollment::Column::StudentId.eq(student_id));
        if let Some(id) = except {
            existing = existing.filter(enrollment::Column::Id.ne(id));
        }

        if existing.count(conn).await? > 0 {
            return Err(ServiceError::AlreadyEnrolled);
        }

        Ok(())
    }

    fn map_conflict(err: sea_orm::DbErr, cohort_id: Uuid, student_id: Uuid) -> ServiceError {
        if ServiceError::is_unique_violation(&err) {
            warn!("Concurrent enrollment of student {student_id} in cohort {cohort_id} rejected");
            ServiceError::AlreadyEnrolled
        } else {
            err.into()
        }
    }

    /// Enrolls a student in a cohort.
    ///
    /// Fails with [`ServiceError::AlreadyEnrolled`] when any enrollment for the
    /// pair exists, whatever its `active` flag. The unique index on the pair
    /// settles concurrent attempts; the loser gets the same error.
    pub async fn create(
        db: &DatabaseConnection,
        new_enrollment: NewEnrollment,
    ) -> Result<enrollment::Model, ServiceError> {
        let NewEnrollment {
            cohort_id,
            student_id,
            active,
        } = new_enrollment;

        let txn = db.begin().await?;

        if let Err(err) = Self::check_pair(&txn, cohort_id, student_id, None).await {
            if matches!(err, ServiceError::AlreadyEnrolled) {
                info!("Student {student_id} is already enrolled in cohort {cohort_id}");
            }
            return Err(err);
        }

        let enrollment = enrollment::ActiveModel {
            id: Set(Uuid::new_v4()),
            cohort_id: Set(cohort_id),
            student_id: Set(student_id),
            enrolled_at: Set(now()),
            active: Set(active),
        }
        .insert(&txn)
        .await
        .map_err(|err| Self::map_conflict(err, cohort_id, student_id))?;

        txn.commit()
            .await
            .map_err(|err| Self::map_conflict(err, cohort_id, student_id))?;

        info!("Enrolled student {student_id} in cohort {cohort_id}");
        Ok(enrollment)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        update: EnrollmentUpdate,
    ) -> Result<enrollment::Model, ServiceError> {
        let txn = db.begin().await?;

        let existing = enrollment::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::EnrollmentNotFound)?;

        let cohort_id = update.cohort_id.unwrap_or(existing.cohort_id);
        let student_id = update.student_id.unwrap_or(existing.student_id);
        if (cohort_id, student_id) != (existing.cohort_id, existing.student_id) {
            Self::check_pair(&txn, cohort_id, student_id, Some(id)).await?;
        }

        let mut enrollment: enrollment::ActiveModel = existing.into();
        enrollment.cohort_id = Set(cohort_id);
        enrollment.student_id = Set(student_id);
        if let Some(active) = update.active {
            enrollment.active = Set(active);
        }

        let enrollment = enrollment
            .update(&txn)
            .await
            .map_err(|err| Self::map_conflict(err, cohort_id, student_id))?;
        txn.commit().await?;

        Ok(enrollment)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let enrollment = Self::get(db, id).await?;
        enrollment.delete(db).await?;

        info!("Deleted enrollment {id}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::*;

    struct Fixture {
        db: DatabaseConnection,
        cohort: cohort::Model,
        other_cohort: cohort::Model,
        student: student::Model,
    }

    async fn fixture() -> Fixture {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let cohort = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;
        let other_cohort = seed_cohort(&db, program.id, "June", date(2025, 6, 1)).await;
        let student = seed_student(&db, "erin").await;

        Fixture {
            db,
            cohort,
            other_cohort,
            student,
        }
    }

    fn pair(cohort_id: Uuid, student_id: Uuid, active: bool) -> NewEnrollment {
        NewEnrollment {
            cohort_id,
            student_id,
            active,
        }
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_rejected() {
        let f = fixture().await;

        for active in [true, false] {
            let db = test_db().await;
            let program = seed_program(&db, "Rust").await;
            let cohort = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;
            let student = seed_student(&db, "erin").await;

            EnrollmentService::create(&db, pair(cohort.id, student.id, active))
                .await
                .unwrap();

            for retry_active in [true, false] {
                assert!(matches!(
                    EnrollmentService::create(&db, pair(cohort.id, student.id, retry_active))
                        .await,
                    Err(ServiceError::AlreadyEnrolled)
                ));
            }

            assert_eq!(enrollment::Entity::find().count(&db).await.unwrap(), 1);
        }

        // A different cohort is a different pair
        EnrollmentService::create(&f.db, pair(f.cohort.id, f.student.id, true))
            .await
            .unwrap();
        EnrollmentService::create(&f.db, pair(f.other_cohort.id, f.student.id, true))
            .await
            .unwrap();
        assert_eq!(enrollment::Entity::find().count(&f.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unique_index_backs_the_check() {
        let f = fixture().await;
        EnrollmentService::create(&f.db, pair(f.cohort.id, f.student.id, true))
            .await
            .unwrap();

        // Bypass the service precondition, as a concurrent writer would
        let raw = enrollment::ActiveModel {
            id: Set(Uuid::new_v4()),
            cohort_id: Set(f.cohort.id),
            student_id: Set(f.student.id),
            enrolled_at: Set(now()),
            active: Set(true),
        }
        .insert(&f.db)
        .await
        .unwrap_err();

        assert!(matches!(
            EnrollmentService::map_conflict(raw, f.cohort.id, f.student.id),
            ServiceError::AlreadyEnrolled
        ));
    }

    #[tokio::test]
    async fn test_missing_references() {
        let f = fixture().await;

        assert!(matches!(
            EnrollmentService::create(&f.db, pair(Uuid::new_v4(), f.student.id, true)).await,
            Err(ServiceError::CohortNotFound)
        ));
        assert!(matches!(
            EnrollmentService::create(&f.db, pair(f.cohort.id, Uuid::new_v4(), true)).await,
            Err(ServiceError::StudentNotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_and_snapshots() {
        let f = fixture().await;
        let first = EnrollmentService::create(&f.db, pair(f.cohort.id, f.student.id, true))
            .await
            .unwrap();
        let second =
            EnrollmentService::create(&f.db, pair(f.other_cohort.id, f.student.id, true))
                .await
                .unwrap();

        let deactivated = EnrollmentService::update(
            &f.db,
            first.id,
            EnrollmentUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!deactivated.active);

        let snapshots = EnrollmentService::snapshots_for(&f.db, f.student.id, f.cohort.id)
            .await
            .unwrap();
        assert_eq!(
            snapshots,
            vec![EnrollmentSnapshot {
                cohort_id: f.cohort.id,
                student_id: f.student.id,
                active: false,
            }]
        );

        // Moving the second enrollment onto the first one's pair collides
        assert!(matches!(
            EnrollmentService::update(
                &f.db,
                second.id,
                EnrollmentUpdate {
                    cohort_id: Some(f.cohort.id),
                    ..Default::default()
                },
            )
            .await,
            Err(ServiceError::AlreadyEnrolled)
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let f = fixture().await;
        let other_student = seed_student(&f.db, "frank").await;
        let erin = EnrollmentService::create(&f.db, pair(f.cohort.id, f.student.id, true))
            .await
            .unwrap();
        EnrollmentService::create(&f.db, pair(f.cohort.id, other_student.id, true))
            .await
            .unwrap();

        let in_cohort = EnrollmentService::list(
            &f.db,
            EnrollmentFilter {
                cohort: Some(f.cohort.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(in_cohort.len(), 2);

        let for_erin = EnrollmentService::list(
            &f.db,
            EnrollmentFilter {
                student: Some(f.student.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(for_erin.len(), 1);

        EnrollmentService::delete(&f.db, erin.id).await.unwrap();
        assert!(matches!(
            EnrollmentService::get(&f.db, erin.id).await,
            Err(ServiceError::EnrollmentNotFound)
        ));
    }
}
