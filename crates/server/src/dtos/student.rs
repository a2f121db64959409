use chrono::NaiveDateTime;
use database::{
    entities::student,
    services::student::{NewStudent, StudentUpdate},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<student::Model> for StudentResponse {
    fn from(student: student::Model) -> Self {
        Self {
            id: student.id,
            account_id: student.account_id,
            name: student.name,
            email: student.email,
            phone: student.phone,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// Admin request creating a profile for an existing account
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewStudentRequest {
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<NewStudentRequest> for NewStudent {
    fn from(request: NewStudentRequest) -> Self {
        Self {
            account_id: request.account_id,
            name: request.name,
            email: request.email,
            phone: request.phone,
        }
    }
}

/// Profile fields, used both for updates and self-registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentProfileRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<StudentProfileRequest> for StudentUpdate {
    fn from(request: StudentProfileRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
        }
    }
}

impl StudentProfileRequest {
    pub fn into_new_student(self, account_id: String) -> NewStudent {
        NewStudent {
            account_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}
