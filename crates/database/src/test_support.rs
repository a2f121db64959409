use crate::entities::{cohort, resource, student, training_program};
use chrono::{NaiveDate, Utc};
use migration::{Migrator, MigratorTrait};
use models::resource_kind::ResourceKind;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Fresh in-memory SQLite database with the full schema applied
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn seed_program(db: &DatabaseConnection, name: &str) -> training_program::Model {
    let now = Utc::now().naive_utc();
    training_program::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        description: Set(format!("{name} description")),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_cohort(
    db: &DatabaseConnection,
    program_id: Uuid,
    name: &str,
    start_date: NaiveDate,
) -> cohort::Model {
    let now = Utc::now().naive_utc();
    cohort::ActiveModel {
        id: Set(Uuid::new_v4()),
        training_program_id: Set(program_id),
        name: Set(name.to_owned()),
        start_date: Set(start_date),
        end_date: Set(start_date + chrono::Days::new(90)),
        access_link: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_resource(
    db: &DatabaseConnection,
    cohort_id: Uuid,
    name: &str,
    order: i32,
    draft: bool,
    access_previous: bool,
) -> resource::Model {
    let now = Utc::now().naive_utc();
    resource::ActiveModel {
        id: Set(Uuid::new_v4()),
        cohort_id: Set(cohort_id),
        kind: Set(ResourceKind::Pdf),
        access_previous: Set(access_previous),
        draft: Set(draft),
        name: Set(name.to_owned()),
        description: Set(String::new()),
        file: Set(Some(format!("resources/{name}.pdf"))),
        url: Set(None),
        order: Set(order),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_student(db: &DatabaseConnection, account_id: &str) -> student::Model {
    let now = Utc::now().naive_utc();
    student::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(account_id.to_owned()),
        name: Set(account_id.to_owned()),
        email: Set(format!("{account_id}@example.com")),
        phone: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}
