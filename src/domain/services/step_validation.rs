//! Step validation - Pure predicates deciding whether a wizard step is complete
//!
//! Predicates never mutate the draft and are re-run on every advance attempt.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{IntakeDraft, Step};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Stable identifiers for every step either flow uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    BasicInfo,
    Details,
    Verify,
    CaseBasics,
    PhysicalDetails,
    CurrentStatus,
    ActionPlan,
}

impl StepId {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BasicInfo | Self::CaseBasics => "Basic Info",
            Self::Details => "Additional Details",
            Self::Verify => "Verify Phone",
            Self::PhysicalDetails => "Physical Details",
            Self::CurrentStatus => "Current Status",
            Self::ActionPlan => "Action Plan",
        }
    }

    /// Evaluate this step's predicate against the draft
    pub fn is_satisfied(&self, draft: &IntakeDraft) -> bool {
        match self {
            Self::BasicInfo => basic_info(draft),
            Self::Details => details(draft),
            Self::Verify => verify(draft),
            Self::CaseBasics => case_basics(draft),
            Self::PhysicalDetails => physical_details(draft),
            Self::CurrentStatus => current_status(draft),
            Self::ActionPlan => action_plan(draft),
        }
    }
}

/// The two intake flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeFlow {
    /// A volunteer signing up
    VolunteerRegistration,
    /// A field report about a person in need
    CaseReport,
}

impl IntakeFlow {
    pub fn step_ids(&self) -> &'static [StepId] {
        match self {
            Self::VolunteerRegistration => &[StepId::BasicInfo, StepId::Details, StepId::Verify],
            Self::CaseReport => &[
                StepId::CaseBasics,
                StepId::PhysicalDetails,
                StepId::CurrentStatus,
                StepId::ActionPlan,
            ],
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.step_ids().iter().copied().map(Step::from).collect()
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn basic_info(draft: &IntakeDraft) -> bool {
    filled(&draft.name)
        && draft.birth_date.is_some()
        && is_valid_email(&draft.email)
        && filled(&draft.phone)
}

pub fn details(draft: &IntakeDraft) -> bool {
    filled(&draft.preferred_language)
        && filled(&draft.area_of_operation)
        && draft.availability.has_valid_window()
        && draft.availability.days.any()
}

pub fn verify(draft: &IntakeDraft) -> bool {
    filled(&draft.verification_code)
}

pub fn case_basics(draft: &IntakeDraft) -> bool {
    filled(&draft.name) && draft.location.is_known()
}

pub fn physical_details(draft: &IntakeDraft) -> bool {
    filled(&draft.physical_description)
}

pub fn current_status(draft: &IntakeDraft) -> bool {
    filled(&draft.mental_state) && filled(&draft.physical_state)
}

pub fn action_plan(draft: &IntakeDraft) -> bool {
    filled(&draft.suggested_action)
}
