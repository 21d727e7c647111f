//! Case sink port - Where finished intake drafts are handed off

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::IntakeDraft;
use crate::domain::services::IntakeFlow;
use crate::domain::value_objects::{CaseId, SessionId};

/// A finished draft wrapped for hand-off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSubmission {
    pub case_id: CaseId,
    pub session_id: SessionId,
    pub flow: IntakeFlow,
    pub submitted_at: DateTime<Utc>,
    pub draft: IntakeDraft,
}

/// Acknowledgement from the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub case_id: CaseId,
    /// Sink-side reference, when the sink issues one
    pub reference: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("case sink unreachable: {0}")]
    Unreachable(String),
    #[error("case sink rejected the submission: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait CaseSinkPort: Send + Sync {
    async fn accept(&self, submission: &CaseSubmission) -> Result<SubmissionReceipt, SinkError>;
}
