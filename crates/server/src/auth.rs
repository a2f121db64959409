use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use database::services::student::StudentService;
use models::role::{Requester, Role};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// Claims read from a validated access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppClaims {
    pub sub: Option<String>,
    /// Roles granted by the identity provider
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The authenticated caller behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub account_id: String,
    pub role: Role,
}

impl Caller {
    pub fn from_claims(claims: &AppClaims, admin_role: &str) -> Result<Self, ApiError> {
        let account_id = claims
            .sub
            .clone()
            .filter(|sub| !sub.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let role = if claims.roles.iter().any(|role| role == admin_role) {
            Role::Admin
        } else {
            Role::Student
        };

        Ok(Self { account_id, role })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Resolves the caller to a [`Requester`]; students need a linked profile
    pub async fn requester(&self, db: &DatabaseConnection) -> Result<Requester, ApiError> {
        match self.role {
            Role::Admin => Ok(Requester::Admin),
            Role::Student => {
                let student = StudentService::profile(db, &self.account_id).await?;
                Ok(Requester::Student {
                    student_id: student.id,
                })
            }
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AppClaims>()
            .ok_or(ApiError::Unauthorized)?;

        Self::from_claims(claims, &state.admin_role)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn claims(sub: Option<&str>, roles: &[&str]) -> AppClaims {
        AppClaims {
            sub: sub.map(str::to_owned),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_from_claims() {
        let admin = Caller::from_claims(&claims(Some("u1"), &["staff", "admin"]), "admin").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.require_admin().is_ok());

        let student = Caller::from_claims(&claims(Some("u2"), &["staff"]), "admin").unwrap();
        assert_eq!(student.role, Role::Student);
        assert!(matches!(student.require_admin(), Err(ApiError::Forbidden)));
    }

    #[test]
    fn test_missing_subject() {
        assert!(matches!(
            Caller::from_claims(&claims(None, &["admin"]), "admin"),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            Caller::from_claims(&claims(Some(""), &[]), "admin"),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_claims_without_roles_deserialize() {
        let parsed: AppClaims = serde_json::from_str(r#"{"sub":"abc"}"#).unwrap();
        assert!(parsed.roles.is_empty());
    }
}
