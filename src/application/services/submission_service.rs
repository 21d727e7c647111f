//! Submission Pipeline - Hands a finished draft to the case sink

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::application::ports::outbound::{CaseSinkPort, CaseSubmission, SubmissionReceipt};
use crate::domain::entities::WizardSession;
use crate::domain::services::IntakeFlow;
use crate::domain::value_objects::{CaseId, ErrorKind, SessionId};

pub const SUBMITTED_NOTICE: &str = "Case submitted successfully!";

/// Submission is split in three so the session lock is only held while
/// the wizard is read or written, never across the sink call.
pub struct SubmissionPipeline {
    sink: Arc<dyn CaseSinkPort>,
}

impl SubmissionPipeline {
    pub fn new(sink: Arc<dyn CaseSinkPort>) -> Self {
        Self { sink }
    }

    /// Check the wizard may be submitted and wrap its draft.
    ///
    /// Validation problems come back as `ValidationFailed`; see
    /// [`WizardSession::prepare_submission`] for which ones are recorded.
    pub fn prepare(
        session_id: SessionId,
        flow: IntakeFlow,
        wizard: &mut WizardSession,
    ) -> Result<CaseSubmission, ErrorKind> {
        let draft = wizard.prepare_submission()?;
        Ok(CaseSubmission {
            case_id: CaseId::new(),
            session_id,
            flow,
            submitted_at: Utc::now(),
            draft,
        })
    }

    /// Hand a prepared submission to the sink
    #[instrument(skip(self, submission), fields(session_id = %submission.session_id))]
    pub async fn deliver(
        &self,
        submission: &CaseSubmission,
    ) -> Result<SubmissionReceipt, ErrorKind> {
        match self.sink.accept(submission).await {
            Ok(receipt) => {
                info!(case_id = %receipt.case_id, flow = ?submission.flow, "Case submitted");
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, case_id = %submission.case_id, "Case submission failed");
                Err(ErrorKind::SubmissionFailed)
            }
        }
    }

    /// Apply the sink's answer.
    ///
    /// Success makes the wizard `Complete`. Failure leaves it where it is with
    /// `SubmissionFailed` recorded and the draft intact.
    pub fn settle(wizard: &mut WizardSession, outcome: &Result<SubmissionReceipt, ErrorKind>) {
        match outcome {
            Ok(_) => wizard.complete_submission(SUBMITTED_NOTICE),
            Err(_) => wizard.fail_submission(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::SinkError;
    use crate::domain::entities::{DraftUpdate, TextField, WizardState};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingSink {
        fail: bool,
        received: Mutex<Vec<CaseSubmission>>,
    }

    impl RecordingSink {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                received: Mutex::new(Vec::new()),
            })
        }

        fn count(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CaseSinkPort for RecordingSink {
        async fn accept(
            &self,
            submission: &CaseSubmission,
        ) -> Result<SubmissionReceipt, SinkError> {
            self.received.lock().unwrap().push(submission.clone());
            if self.fail {
                return Err(SinkError::Rejected("intake desk offline".to_string()));
            }
            Ok(SubmissionReceipt {
                case_id: submission.case_id,
                reference: Some("CASE-0001".to_string()),
            })
        }
    }

    async fn submit(
        pipeline: &SubmissionPipeline,
        wizard: &mut WizardSession,
    ) -> Result<SubmissionReceipt, ErrorKind> {
        let submission =
            SubmissionPipeline::prepare(SessionId::new(), IntakeFlow::VolunteerRegistration, wizard)?;
        let outcome = pipeline.deliver(&submission).await;
        SubmissionPipeline::settle(wizard, &outcome);
        outcome
    }

    fn set(wizard: &mut WizardSession, field: TextField, value: &str) {
        wizard.update_field(DraftUpdate::Text(field, value.to_string()));
    }

    fn volunteer_wizard_at_verify() -> WizardSession {
        use chrono::{NaiveDate, NaiveTime};

        let mut wizard = WizardSession::for_flow(IntakeFlow::VolunteerRegistration);
        set(&mut wizard, TextField::Name, "Priya");
        set(&mut wizard, TextField::Email, "priya@example.org");
        set(&mut wizard, TextField::Phone, "9840000000");
        wizard.update_field(DraftUpdate::Date(
            crate::domain::entities::DateField::BirthDate,
            NaiveDate::from_ymd_opt(1995, 4, 12),
        ));
        wizard.advance().unwrap();

        set(&mut wizard, TextField::PreferredLanguage, "Tamil");
        set(&mut wizard, TextField::AreaOfOperation, "Porur");
        wizard.update_field(DraftUpdate::Time(
            crate::domain::entities::TimeField::Start,
            NaiveTime::from_hms_opt(9, 0, 0),
        ));
        wizard.update_field(DraftUpdate::Time(
            crate::domain::entities::TimeField::End,
            NaiveTime::from_hms_opt(17, 0, 0),
        ));
        wizard.toggle_day(chrono::Weekday::Mon);
        wizard.advance().unwrap();
        wizard
    }

    #[tokio::test]
    async fn test_submit_before_final_step_is_rejected() {
        let sink = RecordingSink::new(false);
        let pipeline = SubmissionPipeline::new(sink.clone());
        let mut wizard = WizardSession::for_flow(IntakeFlow::VolunteerRegistration);

        let result = submit(&pipeline, &mut wizard).await;

        assert_eq!(result, Err(ErrorKind::ValidationFailed));
        assert_eq!(wizard.state(), WizardState::Step(0));
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn test_unsatisfied_final_step_never_reaches_sink() {
        let sink = RecordingSink::new(false);
        let pipeline = SubmissionPipeline::new(sink.clone());
        let mut wizard = volunteer_wizard_at_verify();

        let result = submit(&pipeline, &mut wizard).await;

        assert_eq!(result, Err(ErrorKind::ValidationFailed));
        assert!(wizard.is_final_step());
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn test_successful_submission_completes() {
        let sink = RecordingSink::new(false);
        let pipeline = SubmissionPipeline::new(sink.clone());
        let mut wizard = volunteer_wizard_at_verify();
        set(&mut wizard, TextField::VerificationCode, "123456");

        let receipt = submit(&pipeline, &mut wizard).await.unwrap();

        assert_eq!(receipt.reference.as_deref(), Some("CASE-0001"));
        assert!(wizard.is_complete());
        assert_eq!(wizard.notice(), Some(SUBMITTED_NOTICE));
        assert_eq!(wizard.draft().name, "Priya");
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_preserves_draft() {
        let sink = RecordingSink::new(true);
        let pipeline = SubmissionPipeline::new(sink.clone());
        let mut wizard = volunteer_wizard_at_verify();
        set(&mut wizard, TextField::VerificationCode, "123456");

        let result = submit(&pipeline, &mut wizard).await;

        assert_eq!(result, Err(ErrorKind::SubmissionFailed));
        assert!(wizard.is_final_step());
        assert_eq!(wizard.last_error(), Some(ErrorKind::SubmissionFailed));
        assert_eq!(wizard.draft().verification_code, "123456");
        assert!(wizard.draft().availability.days.monday);
    }
}
