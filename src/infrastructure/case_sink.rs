//! Case sinks - Where accepted intake drafts go
//!
//! `HttpCaseSink` posts each submission as JSON to an intake endpoint.
//! `InMemoryCaseSink` keeps them in process when no endpoint is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::application::ports::outbound::{
    CaseSinkPort, CaseSubmission, SinkError, SubmissionReceipt,
};

/// Holds submissions in memory
#[derive(Default)]
pub struct InMemoryCaseSink {
    accepted: Mutex<Vec<CaseSubmission>>,
}

impl InMemoryCaseSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn accepted(&self) -> Vec<CaseSubmission> {
        self.accepted.lock().await.clone()
    }
}

#[async_trait]
impl CaseSinkPort for InMemoryCaseSink {
    async fn accept(&self, submission: &CaseSubmission) -> Result<SubmissionReceipt, SinkError> {
        let mut accepted = self.accepted.lock().await;
        accepted.push(submission.clone());
        tracing::info!(
            "Stored case {} in memory ({} held)",
            submission.case_id,
            accepted.len()
        );
        Ok(SubmissionReceipt {
            case_id: submission.case_id,
            reference: None,
        })
    }
}

/// Posts submissions to a remote intake endpoint
pub struct HttpCaseSink {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Default, Deserialize)]
struct SinkResponse {
    #[serde(default)]
    reference: Option<String>,
}

impl HttpCaseSink {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CaseSinkPort for HttpCaseSink {
    async fn accept(&self, submission: &CaseSubmission) -> Result<SubmissionReceipt, SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected(format!("{}: {}", status, error_text)));
        }

        // An empty or non-JSON acknowledgement still counts as accepted
        let body: SinkResponse = response.json().await.unwrap_or_default();
        Ok(SubmissionReceipt {
            case_id: submission.case_id,
            reference: body.reference,
        })
    }
}
