use uuid::Uuid;

/// Role of whoever is looking at a cohort or its resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Student,
}

/// A verified caller, as handed over by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Admin,
    Student { student_id: Uuid },
}

impl Requester {
    pub fn role(self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Student { .. } => Role::Student,
        }
    }
}
