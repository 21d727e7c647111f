//! Session management for active intake wizards
//!
//! Each renderer-side wizard is backed by one `IntakeSession` held in the
//! `SessionManager`. Sessions are shared as `Arc`s so a slow capture can run
//! without holding the registry lock; removal marks the session discarded so
//! anything still holding it can tell its results are no longer wanted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::application::services::LocationCaptureService;
use crate::domain::entities::WizardSession;
use crate::domain::services::IntakeFlow;
use crate::domain::value_objects::SessionId;

/// One in-progress intake wizard
pub struct IntakeSession {
    pub id: SessionId,
    pub flow: IntakeFlow,
    pub created_at: DateTime<Utc>,
    /// Unix millis of the last request that touched this session
    last_active: AtomicI64,
    discarded: AtomicBool,
    submitting: AtomicBool,
    pub wizard: Mutex<WizardSession>,
    pub locator: Arc<LocationCaptureService>,
}

impl IntakeSession {
    pub fn new(flow: IntakeFlow, locator: LocationCaptureService) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            flow,
            created_at: now,
            last_active: AtomicI64::new(now.timestamp_millis()),
            discarded: AtomicBool::new(false),
            submitting: AtomicBool::new(false),
            wizard: Mutex::new(WizardSession::for_flow(flow)),
            locator: Arc::new(locator),
        }
    }

    pub fn touch(&self) {
        self.last_active
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_active.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded.load(Ordering::Acquire)
    }

    fn mark_discarded(&self) {
        self.discarded.store(true, Ordering::Release);
    }

    /// Claim the session's single submission slot
    pub fn try_begin_submission(&self) -> Option<Submitting<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Submitting(&self.submitting))
    }
}

/// Held while a submission is with the case sink
pub struct Submitting<'a>(&'a AtomicBool);

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Manages active intake sessions
#[derive(Default)]
pub struct SessionManager {
    sessions: HashMap<SessionId, Arc<IntakeSession>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and hand back a shared handle to it
    pub fn create_session(
        &mut self,
        flow: IntakeFlow,
        locator: LocationCaptureService,
    ) -> Arc<IntakeSession> {
        let session = Arc::new(IntakeSession::new(flow, locator));
        self.sessions.insert(session.id, Arc::clone(&session));
        tracing::info!("Created intake session {} ({:?})", session.id, flow);
        session
    }

    pub fn get_session(&self, session_id: SessionId) -> Option<Arc<IntakeSession>> {
        self.sessions.get(&session_id).cloned()
    }

    /// Remove a session. Outstanding handles see it as discarded.
    pub fn remove_session(&mut self, session_id: SessionId) -> Option<Arc<IntakeSession>> {
        let session = self.sessions.remove(&session_id)?;
        session.mark_discarded();
        tracing::info!("Removed intake session {}", session_id);
        Some(session)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every session idle for longer than `max_idle`
    pub fn prune_idle(&mut self, max_idle: Duration) -> Vec<SessionId> {
        let cutoff = Utc::now() - max_idle;
        let stale: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|session| session.last_active() < cutoff)
            .map(|session| session.id)
            .collect();

        for session_id in &stale {
            self.remove_session(*session_id);
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{GeocodeError, GeocoderPort};
    use crate::application::services::CaptureSettings;
    use crate::domain::value_objects::Coordinates;
    use async_trait::async_trait;

    struct NoGeocoder;

    #[async_trait]
    impl GeocoderPort for NoGeocoder {
        async fn reverse(&self, _: Coordinates) -> Result<serde_json::Value, GeocodeError> {
            Err(GeocodeError::TimedOut)
        }
    }

    fn locator() -> LocationCaptureService {
        LocationCaptureService::new(Arc::new(NoGeocoder), CaptureSettings::default())
    }

    #[test]
    fn test_create_and_remove_session() {
        let mut manager = SessionManager::new();
        let session = manager.create_session(IntakeFlow::CaseReport, locator());

        assert!(manager.get_session(session.id).is_some());
        assert_eq!(manager.session_count(), 1);

        let removed = manager.remove_session(session.id).unwrap();
        assert!(removed.is_discarded());
        assert!(session.is_discarded());
        assert!(manager.get_session(session.id).is_none());
        assert!(manager.remove_session(session.id).is_none());
    }

    #[test]
    fn test_single_submission_slot() {
        let session = IntakeSession::new(IntakeFlow::CaseReport, locator());

        let first = session.try_begin_submission();
        assert!(first.is_some());
        assert!(session.try_begin_submission().is_none());

        drop(first);
        assert!(session.try_begin_submission().is_some());
    }

    #[test]
    fn test_prune_idle_keeps_recent_sessions() {
        let mut manager = SessionManager::new();
        let stale = manager.create_session(IntakeFlow::CaseReport, locator());
        let fresh = manager.create_session(IntakeFlow::VolunteerRegistration, locator());
        stale.last_active.store(
            (Utc::now() - Duration::minutes(45)).timestamp_millis(),
            Ordering::Relaxed,
        );
        fresh.touch();

        let pruned = manager.prune_idle(Duration::minutes(30));

        assert_eq!(pruned, vec![stale.id]);
        assert!(stale.is_discarded());
        assert!(!fresh.is_discarded());
        assert_eq!(manager.session_count(), 1);
    }
}
