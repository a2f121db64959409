//! Visibility rules for cohort resources.
//!
//! Whether a resource shows up for a viewer is never stored. It is recomputed
//! from the resource's `draft`/`access_previous` flags, the cohort start date
//! and today's date every time it is needed, by both the listing path and the
//! download path.

use crate::role::Role;
use chrono::NaiveDate;

/// The flags on a resource that gate what students can see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gate {
    pub draft: bool,
    pub access_previous: bool,
}

impl Gate {
    pub fn new(draft: bool, access_previous: bool) -> Self {
        Self {
            draft,
            access_previous,
        }
    }
}

/// Outcome of evaluating a [`Gate`] for one viewer on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// Hidden because the resource is still a draft
    Draft,
    /// Hidden because the cohort has not started and early access is off
    BeforeStart,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Anything that carries a resource [`Gate`]
pub trait Gated {
    fn gate(&self) -> Gate;
}

impl Gated for Gate {
    fn gate(&self) -> Gate {
        *self
    }
}

/// A cohort counts as started on its start date itself
pub fn cohort_started(start_date: NaiveDate, today: NaiveDate) -> bool {
    today >= start_date
}

/// Applies the rules in order, first match wins:
/// admins see everything, drafts are hidden from students, and before the
/// cohort starts only resources with early access are shown.
pub fn evaluate(gate: Gate, cohort_start: NaiveDate, role: Role, today: NaiveDate) -> Visibility {
    if role == Role::Admin {
        return Visibility::Visible;
    }

    if gate.draft {
        return Visibility::Draft;
    }

    if !cohort_started(cohort_start, today) && !gate.access_previous {
        return Visibility::BeforeStart;
    }

    Visibility::Visible
}

pub fn is_visible(gate: Gate, cohort_start: NaiveDate, role: Role, today: NaiveDate) -> bool {
    evaluate(gate, cohort_start, role, today).is_visible()
}

/// Keeps the resources `role` may see, in their original relative order
pub fn filter_resource_list<T: Gated>(
    resources: impl IntoIterator<Item = T>,
    cohort_start: NaiveDate,
    role: Role,
    today: NaiveDate,
) -> Vec<T> {
    resources
        .into_iter()
        .filter(|resource| is_visible(resource.gate(), cohort_start, role, today))
        .collect()
}
