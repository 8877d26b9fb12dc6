use super::domain::{ApplicationForm, ApplicationTarget};
use super::executor::{SubmissionExecutor, SubmissionReceipt, SubmissionRequest};
use super::service::ApplicationServiceError;
use super::validation::ValidationErrorMap;
use serde::Serialize;
use tracing::{debug, warn};

/// Where an application draft is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded { receipt: SubmissionReceipt },
    Failed { message: String },
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// An in-progress application form for one target.
#[derive(Debug, Clone)]
pub struct ApplicationDraft<F> {
    target: ApplicationTarget,
    target_name: String,
    form: F,
    errors: ValidationErrorMap,
    status: SubmissionStatus,
}

impl<F: ApplicationForm> ApplicationDraft<F> {
    pub fn new(target: ApplicationTarget, target_name: impl Into<String>) -> Self {
        Self {
            target,
            target_name: target_name.into(),
            form: F::default(),
            errors: ValidationErrorMap::new(),
            status: SubmissionStatus::Idle,
        }
    }

    pub fn with_form(mut self, form: F) -> Self {
        self.form = form;
        self
    }

    pub fn target(&self) -> ApplicationTarget {
        self.target
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrorMap {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Apply an edit to `field`, dropping any error previously reported for it.
    pub fn update<E>(&mut self, field: &str, edit: E)
    where
        E: FnOnce(&mut F),
    {
        edit(&mut self.form);
        self.errors.remove(field);
    }

    /// Recompute the full error map. Returns `true` when the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = F::rules().validate(&self.form);
        self.errors.is_empty()
    }

    /// Validate, then hand the form to `executor`. On success the form resets
    /// to its defaults and the receipt is kept in the status.
    pub async fn submit<E>(
        &mut self,
        executor: &E,
    ) -> Result<SubmissionReceipt, ApplicationServiceError>
    where
        E: SubmissionExecutor + ?Sized,
    {
        if !self.validate() {
            debug!(
                target_kind = self.target.label(),
                target_id = self.target.id(),
                failing_fields = self.errors.len(),
                "application rejected by validation"
            );
            return Err(ApplicationServiceError::Invalid(self.errors.clone()));
        }

        let request = SubmissionRequest {
            target: self.target,
            target_name: self.target_name.clone(),
            applicant_name: self.form.applicant_name(),
            applicant_email: self.form.applicant_email().to_string(),
            form: serde_json::to_value(&self.form)?,
        };

        self.status = SubmissionStatus::Submitting;
        match executor.submit(request).await {
            Ok(receipt) => {
                self.form = F::default();
                self.errors.clear();
                self.status = SubmissionStatus::Succeeded {
                    receipt: receipt.clone(),
                };
                Ok(receipt)
            }
            Err(error) => {
                warn!(
                    target_kind = self.target.label(),
                    target_id = self.target.id(),
                    error = %error,
                    "application submission failed"
                );
                self.status = SubmissionStatus::Failed {
                    message: error.to_string(),
                };
                Err(error.into())
            }
        }
    }

    /// Discard the draft without submitting.
    pub fn cancel(self) {
        debug!(
            target_kind = self.target.label(),
            target_id = self.target.id(),
            "application draft discarded"
        );
    }
}
