use super::{now, required_text};
use crate::{entities::student, error::ServiceError};
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// A new student profile linked to an external account
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Editable profile fields
#[derive(Debug, Clone)]
pub struct StudentUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = required_text("email", email, 254)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ServiceError::Validation(format!(
            "{email:?} is not a valid email address"
        ))),
    }
}

fn validate_phone(phone: Option<String>) -> Result<Option<String>, ServiceError> {
    match phone.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(phone) if phone.chars().count() <= 20 => Ok(Some(phone.to_owned())),
        Some(_) => Err(ServiceError::Validation(
            "phone must be at most 20 characters".to_owned(),
        )),
    }
}

pub struct StudentService;

impl StudentService {
    /// All students, alphabetically
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<student::Model>, ServiceError> {
        let students = student::Entity::find()
            .order_by_asc(student::Column::Name)
            .all(db)
            .await?;

        Ok(students)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<student::Model, ServiceError> {
        student::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::StudentNotFound)
    }

    /// Profile linked to an external account, if one exists
    pub async fn find_by_account(
        db: &DatabaseConnection,
        account_id: &str,
    ) -> Result<Option<student::Model>, ServiceError> {
        let student = student::Entity::find()
            .filter(student::Column::AccountId.eq(account_id))
            .one(db)
            .await?;

        Ok(student)
    }

    /// Profile of the authenticated account
    pub async fn profile(
        db: &DatabaseConnection,
        account_id: &str,
    ) -> Result<student::Model, ServiceError> {
        Self::find_by_account(db, account_id)
            .await?
            .ok_or(ServiceError::StudentProfileNotFound)
    }

    async fn email_taken(
        db: &DatabaseConnection,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<bool, ServiceError> {
        let mut query = student::Entity::find().filter(student::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(student::Column::Id.ne(id));
        }

        Ok(query.count(db).await? > 0)
    }

    pub async fn create(
        db: &DatabaseConnection,
        new_student: NewStudent,
    ) -> Result<student::Model, ServiceError> {
        let account_id = required_text("account_id", &new_student.account_id, 255)?;
        let name = required_text("name", &new_student.name, 200)?;
        let email = validate_email(&new_student.email)?;
        let phone = validate_phone(new_student.phone)?;

        if Self::find_by_account(db, &account_id).await?.is_some() {
            return Err(ServiceError::ProfileAlreadyExists);
        }
        if Self::email_taken(db, &email, None).await? {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        Self::insert(db, account_id, name, email, phone).await
    }

    /// Inserts a validated profile. A concurrent registration can still win
    /// the unique keys between the checks and this insert.
    async fn insert(
        db: &DatabaseConnection,
        account_id: String,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<student::Model, ServiceError> {
        let timestamp = now();
        let result = student::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id.clone()),
            name: Set(name),
            email: Set(email),
            phone: Set(phone),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await;

        match result {
            Ok(student) => {
                info!("Created student {} ({})", student.name, student.id);
                Ok(student)
            }
            Err(err) if ServiceError::is_unique_violation(&err) => {
                warn!("Concurrent student registration rejected: {err}");
                if Self::find_by_account(db, &account_id).await?.is_some() {
                    Err(ServiceError::ProfileAlreadyExists)
                } else {
                    Err(ServiceError::EmailAlreadyRegistered)
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        update: StudentUpdate,
    ) -> Result<student::Model, ServiceError> {
        let name = required_text("name", &update.name, 200)?;
        let email = validate_email(&update.email)?;
        let phone = validate_phone(update.phone)?;
        let existing = Self::get(db, id).await?;

        if Self::email_taken(db, &email, Some(id)).await? {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        Self::save(db, existing, name, email, phone).await
    }

    async fn save(
        db: &DatabaseConnection,
        existing: student::Model,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<student::Model, ServiceError> {
        let mut student: student::ActiveModel = existing.into();
        student.name = Set(name);
        student.email = Set(email);
        student.phone = Set(phone);
        student.updated_at = Set(now());

        // Only the email can collide; the account link never changes
        student.update(db).await.map_err(|err| {
            if ServiceError::is_unique_violation(&err) {
                warn!("Concurrent email change rejected: {err}");
                ServiceError::EmailAlreadyRegistered
            } else {
                err.into()
            }
        })
    }

    /// Deletes a student and their enrollments
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let student = Self::get(db, id).await?;
        student.delete(db).await?;

        info!("Deleted student {id}");
        Ok(())
    }
}
