//! Download authorization.
//!
//! [`authorize_download`] is the single entry point deciding whether a caller
//! may fetch a resource's file. It only ever hands back a [`FileHandle`]; reading
//! the bytes is up to the caller.

use crate::{
    role::Requester,
    visibility::{self, Gate, Visibility},
};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Reasons a download is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("You are not enrolled in this cohort")]
    NotEnrolled,
    #[error("Resource is not available")]
    NotAvailable,
    #[error("Resource is only available after the cohort starts")]
    NotYetAvailable,
    #[error("Resource has no file attached")]
    NoFileAttached,
}

/// Reference to a stored file, relative to the media root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle(String);

impl FileHandle {
    pub fn path(&self) -> &str {
        &self.0
    }

    /// Last path segment, used as the download file name
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

/// What the guard needs to know about the requested resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSnapshot {
    pub cohort_id: Uuid,
    pub cohort_start: NaiveDate,
    pub gate: Gate,
    pub file: Option<String>,
}

/// One enrollment row of the requesting student
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentSnapshot {
    pub cohort_id: Uuid,
    pub student_id: Uuid,
    pub active: bool,
}

fn attached_file(resource: &ResourceSnapshot) -> Result<FileHandle, Denial> {
    match resource.file.as_deref() {
        Some(path) if !path.is_empty() => Ok(FileHandle(path.to_owned())),
        _ => Err(Denial::NoFileAttached),
    }
}

/// Decides whether `requester` may download `resource` on `today`.
///
/// Students must hold an active enrollment in the resource's cohort before any
/// draft or date rule is looked at, so nothing about the resource leaks to
/// students outside the cohort.
pub fn authorize_download(
    requester: Requester,
    resource: &ResourceSnapshot,
    enrollments: &[EnrollmentSnapshot],
    today: NaiveDate,
) -> Result<FileHandle, Denial> {
    let student_id = match requester {
        Requester::Admin => return attached_file(resource),
        Requester::Student { student_id } => student_id,
    };

    let enrolled = enrollments.iter().any(|enrollment| {
        enrollment.active
            && enrollment.student_id == student_id
            && enrollment.cohort_id == resource.cohort_id
    });
    if !enrolled {
        return Err(Denial::NotEnrolled);
    }

    match visibility::evaluate(
        resource.gate,
        resource.cohort_start,
        requester.role(),
        today,
    ) {
        Visibility::Draft => Err(Denial::NotAvailable),
        Visibility::BeforeStart => Err(Denial::NotYetAvailable),
        Visibility::Visible => attached_file(resource),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn resource(
        cohort_id: Uuid,
        start: NaiveDate,
        gate: Gate,
        file: Option<&str>,
    ) -> ResourceSnapshot {
        ResourceSnapshot {
            cohort_id,
            cohort_start: start,
            gate,
            file: file.map(str::to_owned),
        }
    }

    fn enrolled(cohort_id: Uuid, student_id: Uuid, active: bool) -> EnrollmentSnapshot {
        EnrollmentSnapshot {
            cohort_id,
            student_id,
            active,
        }
    }

    #[test]
    fn test_admin_gets_file_regardless_of_flags() {
        let cohort = Uuid::new_v4();
        let start = today() + Days::new(30);
        let res = resource(cohort, start, Gate::new(true, false), Some("resources/a.pdf"));

        let handle = authorize_download(Requester::Admin, &res, &[], today()).unwrap();
        assert_eq!(handle.path(), "resources/a.pdf");
        assert_eq!(handle.file_name(), "a.pdf");
    }

    #[test]
    fn test_admin_without_file() {
        let res = resource(Uuid::new_v4(), today(), Gate::default(), None);
        assert_eq!(
            authorize_download(Requester::Admin, &res, &[], today()),
            Err(Denial::NoFileAttached)
        );

        let blank = resource(Uuid::new_v4(), today(), Gate::default(), Some(""));
        assert_eq!(
            authorize_download(Requester::Admin, &blank, &[], today()),
            Err(Denial::NoFileAttached)
        );
    }

    #[test]
    fn test_unenrolled_student_is_denied_first() {
        let cohort = Uuid::new_v4();
        let student = Uuid::new_v4();
        let requester = Requester::Student { student_id: student };
        let other_cohort = enrolled(Uuid::new_v4(), student, true);
        let other_student = enrolled(cohort, Uuid::new_v4(), true);

        for gate in [Gate::new(true, true), Gate::new(false, false), Gate::new(false, true)] {
            for start in [today() - Days::new(10), today() + Days::new(10)] {
                for file in [None, Some("a.zip")] {
                    let res = resource(cohort, start, gate, file);
                    assert_eq!(
                        authorize_download(
                            requester,
                            &res,
                            &[other_cohort, other_student],
                            today()
                        ),
                        Err(Denial::NotEnrolled)
                    );
                }
            }
        }
    }

    #[test]
    fn test_inactive_enrollment_is_not_enrolled() {
        let cohort = Uuid::new_v4();
        let student = Uuid::new_v4();
        let res = resource(cohort, today(), Gate::default(), Some("a.pdf"));

        assert_eq!(
            authorize_download(
                Requester::Student { student_id: student },
                &res,
                &[enrolled(cohort, student, false)],
                today()
            ),
            Err(Denial::NotEnrolled)
        );
    }

    #[test]
    fn test_student_denials_follow_precedence() {
        let cohort = Uuid::new_v4();
        let student = Uuid::new_v4();
        let requester = Requester::Student { student_id: student };
        let enrollments = [enrolled(cohort, student, true)];
        let future = today() + Days::new(60);

        let draft = resource(cohort, future, Gate::new(true, true), None);
        assert_eq!(
            authorize_download(requester, &draft, &enrollments, today()),
            Err(Denial::NotAvailable)
        );

        let early = resource(cohort, future, Gate::new(false, false), None);
        assert_eq!(
            authorize_download(requester, &early, &enrollments, today()),
            Err(Denial::NotYetAvailable)
        );

        let no_file = resource(cohort, future, Gate::new(false, true), None);
        assert_eq!(
            authorize_download(requester, &no_file, &enrollments, today()),
            Err(Denial::NoFileAttached)
        );
    }

    #[test]
    fn test_student_granted() {
        let cohort = Uuid::new_v4();
        let student = Uuid::new_v4();
        let requester = Requester::Student { student_id: student };
        let enrollments = [enrolled(cohort, student, true)];

        let started = resource(cohort, today(), Gate::new(false, false), Some("r/2025/03/w1.mp4"));
        let handle = authorize_download(requester, &started, &enrollments, today()).unwrap();
        assert_eq!(handle.file_name(), "w1.mp4");

        let early = resource(
            cohort,
            today() + Days::new(60),
            Gate::new(false, true),
            Some("intro.pdf"),
        );
        assert!(authorize_download(requester, &early, &enrollments, today()).is_ok());
    }
}
