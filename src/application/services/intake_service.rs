//! Intake Service - Use cases behind the renderer's wizard calls
//!
//! Every operation resolves a session from the registry, applies one wizard
//! command under the session lock and returns a fresh `SessionView`.
//! Domain failures (validation, location, submission) are carried in the
//! view's `last_error`; only registry and concurrency problems are errors.

use std::sync::Arc;

use chrono::Weekday;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::application::dto::SessionView;
use crate::application::ports::outbound::{CaseSinkPort, GeocoderPort, LocationSensorPort};
use crate::application::services::location_capture_service::{
    CaptureError, CaptureSettings, LocationCaptureService,
};
use crate::application::services::submission_service::SubmissionPipeline;
use crate::domain::entities::{DaysPreset, DraftUpdate, WizardSession, WizardState};
use crate::domain::services::{IntakeFlow, StepId};
use crate::domain::value_objects::SessionId;
use crate::infrastructure::session::{IntakeSession, SessionManager};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("A location capture is already in progress for session {0}")]
    CaptureInProgress(SessionId),
    #[error("A submission is already in progress for session {0}")]
    SubmissionInProgress(SessionId),
    #[error("Session {0} is not on its final step")]
    NotAtFinalStep(SessionId),
}

pub struct IntakeService {
    sessions: RwLock<SessionManager>,
    geocoder: Arc<dyn GeocoderPort>,
    capture_settings: CaptureSettings,
    submission: SubmissionPipeline,
}

impl IntakeService {
    pub fn new(
        geocoder: Arc<dyn GeocoderPort>,
        sink: Arc<dyn CaseSinkPort>,
        capture_settings: CaptureSettings,
    ) -> Self {
        Self {
            sessions: RwLock::new(SessionManager::new()),
            geocoder,
            capture_settings,
            submission: SubmissionPipeline::new(sink),
        }
    }

    async fn session(&self, session_id: SessionId) -> Result<Arc<IntakeSession>, IntakeError> {
        let session = self
            .sessions
            .read()
            .await
            .get_session(session_id)
            .ok_or(IntakeError::SessionNotFound(session_id))?;
        session.touch();
        Ok(session)
    }

    fn render(session: &IntakeSession, wizard: &WizardSession) -> SessionView {
        SessionView::new(session.id, session.flow, wizard, session.locator.is_busy())
    }

    /// Run a synchronous wizard command and render the result
    async fn apply<F>(&self, session_id: SessionId, command: F) -> Result<SessionView, IntakeError>
    where
        F: FnOnce(&mut WizardSession),
    {
        let session = self.session(session_id).await?;
        let mut wizard = session.wizard.lock().await;
        command(&mut wizard);
        Ok(Self::render(&session, &wizard))
    }

    #[instrument(skip(self))]
    pub async fn start(&self, flow: IntakeFlow) -> SessionView {
        let locator = LocationCaptureService::new(Arc::clone(&self.geocoder), self.capture_settings);
        let session = self.sessions.write().await.create_session(flow, locator);
        let wizard = session.wizard.lock().await;
        Self::render(&session, &wizard)
    }

    pub async fn view(&self, session_id: SessionId) -> Result<SessionView, IntakeError> {
        self.apply(session_id, |_| {}).await
    }

    /// Abandon a wizard. Any capture or submission still pending for it is dropped.
    ///
    /// Returns once no command is still writing to the draft.
    #[instrument(skip(self))]
    pub async fn discard(&self, session_id: SessionId) -> Result<(), IntakeError> {
        let session = self
            .sessions
            .write()
            .await
            .remove_session(session_id)
            .ok_or(IntakeError::SessionNotFound(session_id))?;
        let _wizard = session.wizard.lock().await;
        Ok(())
    }

    pub async fn update_field(
        &self,
        session_id: SessionId,
        update: DraftUpdate,
    ) -> Result<SessionView, IntakeError> {
        self.apply(session_id, |wizard| {
            if !wizard.update_field(update) {
                debug!(session_id = %session_id, "Ignoring field update on completed session");
            }
        })
        .await
    }

    pub async fn toggle_day(
        &self,
        session_id: SessionId,
        day: Weekday,
    ) -> Result<SessionView, IntakeError> {
        self.apply(session_id, |wizard| {
            wizard.toggle_day(day);
        })
        .await
    }

    pub async fn select_days(
        &self,
        session_id: SessionId,
        preset: DaysPreset,
    ) -> Result<SessionView, IntakeError> {
        self.apply(session_id, |wizard| {
            wizard.select_days(preset);
        })
        .await
    }

    pub async fn append_photos(
        &self,
        session_id: SessionId,
        references: Vec<String>,
    ) -> Result<SessionView, IntakeError> {
        self.apply(session_id, |wizard| {
            wizard.append_photos(references);
        })
        .await
    }

    /// "Next". On the final step this is a submission.
    #[instrument(skip(self))]
    pub async fn advance(&self, session_id: SessionId) -> Result<SessionView, IntakeError> {
        let session = self.session(session_id).await?;
        let mut wizard = session.wizard.lock().await;

        if wizard.is_final_step() {
            drop(wizard);
            return self.submit_session(&session).await;
        }

        let leaving = wizard.current_step().map(|step| step.id);
        if let Ok(WizardState::Step(_)) = wizard.advance() {
            if leaving == Some(StepId::Details) {
                // The verification code itself is delivered out of band
                info!(session_id = %session_id, "Verification code requested");
            }
        }
        Ok(Self::render(&session, &wizard))
    }

    pub async fn retreat(&self, session_id: SessionId) -> Result<SessionView, IntakeError> {
        self.apply(session_id, |wizard| {
            wizard.retreat();
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn submit(&self, session_id: SessionId) -> Result<SessionView, IntakeError> {
        let session = self.session(session_id).await?;
        self.submit_session(&session).await
    }

    /// Lock order is wizard then registry. The wizard lock is released
    /// while the sink runs so the session stays usable.
    async fn submit_session(&self, session: &IntakeSession) -> Result<SessionView, IntakeError> {
        let Some(_submitting) = session.try_begin_submission() else {
            return Err(IntakeError::SubmissionInProgress(session.id));
        };

        let submission = {
            let mut wizard = session.wizard.lock().await;
            if !wizard.is_final_step() {
                return Err(IntakeError::NotAtFinalStep(session.id));
            }
            match SubmissionPipeline::prepare(session.id, session.flow, &mut wizard) {
                Ok(submission) => submission,
                Err(_) => return Ok(Self::render(session, &wizard)),
            }
        };

        let outcome = self.submission.deliver(&submission).await;

        let mut wizard = session.wizard.lock().await;
        if session.is_discarded() {
            debug!(session_id = %session.id, "Session discarded during submission, dropping result");
            return Err(IntakeError::SessionNotFound(session.id));
        }
        SubmissionPipeline::settle(&mut wizard, &outcome);
        let view = Self::render(session, &wizard).with_receipt(outcome.ok());

        if wizard.is_complete() {
            self.sessions.write().await.remove_session(session.id);
        }
        Ok(view)
    }

    /// Capture the device location into the session's draft.
    ///
    /// The session is only weakly held while the sensor and geocoder run, so
    /// a wizard discarded mid-capture is never written to.
    #[instrument(skip(self, sensor))]
    pub async fn capture_location<S>(
        &self,
        session_id: SessionId,
        sensor: &S,
    ) -> Result<SessionView, IntakeError>
    where
        S: LocationSensorPort + ?Sized,
    {
        let session = self.session(session_id).await?;
        let locator = Arc::clone(&session.locator);
        let handle = Arc::downgrade(&session);
        drop(session);

        let outcome = locator.capture(sensor).await;

        let Some(session) = handle.upgrade().filter(|session| !session.is_discarded()) else {
            debug!(session_id = %session_id, "Session discarded during capture, dropping result");
            return Err(IntakeError::SessionNotFound(session_id));
        };

        let mut wizard = session.wizard.lock().await;
        if session.is_discarded() {
            debug!(session_id = %session_id, "Session discarded while waiting for its draft");
            return Err(IntakeError::SessionNotFound(session_id));
        }
        match outcome {
            Ok(result) => {
                wizard.record_location(&result);
            }
            Err(CaptureError::Failed(kind)) => wizard.record_error(kind),
            Err(CaptureError::InProgress) => {
                return Err(IntakeError::CaptureInProgress(session_id));
            }
        }
        Ok(Self::render(&session, &wizard))
    }

    /// Remove sessions idle for longer than `max_idle`
    pub async fn prune_idle(&self, max_idle: chrono::Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let pruned = sessions.prune_idle(max_idle);
        if !pruned.is_empty() {
            info!(
                count = pruned.len(),
                remaining = sessions.session_count(),
                "Pruned idle intake sessions"
            );
        }
        pruned.len()
    }
}
