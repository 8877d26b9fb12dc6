use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::domain::ApplicationTarget;

pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(2000);

/// A validated application ready to hand off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRequest {
    pub target: ApplicationTarget,
    pub target_name: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub form: serde_json::Value,
}

/// Acknowledgement returned once a submission resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub target: ApplicationTarget,
    pub target_name: String,
    pub applicant_email: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn for_request(request: &SubmissionRequest) -> Self {
        Self {
            reference: Uuid::new_v4(),
            target: request.target,
            target_name: request.target_name.clone(),
            applicant_email: request.applicant_email.clone(),
            submitted_at: Utc::now(),
        }
    }
}

/// Failures while handing a submission off. Distinct from validation errors;
/// retrying is left to the applicant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission could not be delivered: {0}")]
    Transient(String),
}

/// Delivers a validated application somewhere.
#[async_trait]
pub trait SubmissionExecutor: Send + Sync {
    async fn submit(&self, request: SubmissionRequest)
        -> Result<SubmissionReceipt, SubmissionError>;
}

/// Stand-in executor: waits a fixed delay, then always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedSubmission {
    delay: Duration,
}

impl SimulatedSubmission {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSubmission {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMISSION_DELAY)
    }
}

#[async_trait]
impl SubmissionExecutor for SimulatedSubmission {
    async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(
            target_kind = request.target.label(),
            target_id = request.target.id(),
            delay_ms = self.delay.as_millis() as u64,
            "simulating application delivery"
        );
        tokio::time::sleep(self.delay).await;

        let receipt = SubmissionReceipt::for_request(&request);
        info!(
            reference = %receipt.reference,
            target_kind = request.target.label(),
            target_id = request.target.id(),
            "application submitted"
        );
        Ok(receipt)
    }
}
