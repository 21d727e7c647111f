//! Intake DTOs - What the renderer sends and what it gets back

use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::SubmissionReceipt;
use crate::domain::entities::{DaysPreset, IntakeDraft, WizardSession, WizardState};
use crate::domain::services::{IntakeFlow, StepId};
use crate::domain::value_objects::{ErrorKind, SessionId};

/// Request to open a new wizard
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub flow: IntakeFlow,
}

/// Request to set one field by dotted path
#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub path: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Request to flip one boolean leaf
#[derive(Debug, Deserialize)]
pub struct ToggleFieldRequest {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectDaysRequest {
    pub preset: DaysPreset,
}

#[derive(Debug, Deserialize)]
pub struct AppendPhotosRequest {
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub id: StepId,
    pub label: String,
    pub satisfied: bool,
}

/// A user-facing error with its display message
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
    /// Raised by location capture rather than by the form itself
    pub location: bool,
}

impl From<ErrorKind> for ErrorView {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.to_string(),
            retryable: kind.is_retryable(),
            location: kind.is_location_error(),
        }
    }
}

/// Everything the renderer needs to draw a wizard
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub flow: IntakeFlow,
    #[serde(flatten)]
    pub state: WizardState,
    pub step_count: usize,
    pub steps: Vec<StepView>,
    pub current_step: Option<StepId>,
    pub is_final_step: bool,
    pub complete: bool,
    pub draft: IntakeDraft,
    pub last_error: Option<ErrorView>,
    pub notice: Option<String>,
    /// A location capture is pending for this session
    pub capturing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
}

impl SessionView {
    pub fn new(id: SessionId, flow: IntakeFlow, wizard: &WizardSession, capturing: bool) -> Self {
        let draft = wizard.draft();
        Self {
            id,
            flow,
            state: wizard.state(),
            step_count: wizard.steps().len(),
            steps: wizard
                .steps()
                .iter()
                .map(|step| StepView {
                    id: step.id,
                    label: step.label.clone(),
                    satisfied: step.is_satisfied(draft),
                })
                .collect(),
            current_step: wizard.current_step().map(|step| step.id),
            is_final_step: wizard.is_final_step(),
            complete: wizard.is_complete(),
            draft: draft.clone(),
            last_error: wizard.last_error().map(ErrorView::from),
            notice: wizard.notice().map(str::to_string),
            capturing,
            receipt: None,
        }
    }

    pub fn with_receipt(mut self, receipt: Option<SubmissionReceipt>) -> Self {
        self.receipt = receipt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_view_serialization() {
        let wizard = WizardSession::for_flow(IntakeFlow::CaseReport);
        let view = SessionView::new(SessionId::new(), IntakeFlow::CaseReport, &wizard, false);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["flow"], json!("case_report"));
        assert_eq!(value["state"], json!("step"));
        assert_eq!(value["index"], json!(0));
        assert_eq!(value["step_count"], json!(4));
        assert_eq!(value["current_step"], json!("case_basics"));
        assert_eq!(value["steps"][0]["label"], json!("Basic Info"));
        assert_eq!(value["steps"][0]["satisfied"], json!(false));
        assert!(value.get("receipt").is_none());
    }

    #[test]
    fn test_error_view_carries_message() {
        let view = ErrorView::from(ErrorKind::PermissionDenied);
        assert_eq!(
            view.message,
            "Location access denied. Please enable location services."
        );
        assert!(!view.retryable);
        assert!(view.location);
        assert!(!ErrorView::from(ErrorKind::ValidationFailed).location);
    }
}
