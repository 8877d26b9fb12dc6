use std::sync::Arc;

use tracing::info;

use super::domain::{
    ApplicationForm, ApplicationTarget, ScholarshipApplication, UniversityApplication,
};
use super::draft::ApplicationDraft;
use super::executor::{SubmissionError, SubmissionExecutor, SubmissionReceipt};
use super::validation::ValidationErrorMap;
use crate::catalog::CatalogStore;

/// Errors surfaced by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("{} {} not found", .0.label(), .0.id())]
    UnknownTarget(ApplicationTarget),
    #[error("application has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrorMap),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("application could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Application intake against the catalog, delegating delivery to an executor.
pub struct ApplicationService<E> {
    catalog: CatalogStore,
    executor: Arc<E>,
}

impl<E> ApplicationService<E>
where
    E: SubmissionExecutor + 'static,
{
    pub fn new(catalog: CatalogStore, executor: Arc<E>) -> Self {
        Self { catalog, executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Blank draft for a university in the catalog.
    pub fn university_draft(
        &self,
        university_id: u32,
    ) -> Result<ApplicationDraft<UniversityApplication>, ApplicationServiceError> {
        let target = ApplicationTarget::University(university_id);
        let university = self
            .catalog
            .university(university_id)
            .ok_or(ApplicationServiceError::UnknownTarget(target))?;
        Ok(ApplicationDraft::new(target, university.name.clone()))
    }

    /// Blank draft for a scholarship in the catalog.
    pub fn scholarship_draft(
        &self,
        scholarship_id: u32,
    ) -> Result<ApplicationDraft<ScholarshipApplication>, ApplicationServiceError> {
        let target = ApplicationTarget::Scholarship(scholarship_id);
        let scholarship = self
            .catalog
            .scholarship(scholarship_id)
            .ok_or(ApplicationServiceError::UnknownTarget(target))?;
        Ok(ApplicationDraft::new(target, scholarship.name.clone()))
    }

    pub async fn apply_to_university(
        &self,
        university_id: u32,
        form: UniversityApplication,
    ) -> Result<SubmissionReceipt, ApplicationServiceError> {
        let draft = self.university_draft(university_id)?.with_form(form);
        self.submit(draft).await
    }

    pub async fn apply_for_scholarship(
        &self,
        scholarship_id: u32,
        form: ScholarshipApplication,
    ) -> Result<SubmissionReceipt, ApplicationServiceError> {
        let draft = self.scholarship_draft(scholarship_id)?.with_form(form);
        self.submit(draft).await
    }

    async fn submit<F: ApplicationForm>(
        &self,
        mut draft: ApplicationDraft<F>,
    ) -> Result<SubmissionReceipt, ApplicationServiceError> {
        let receipt = draft.submit(self.executor.as_ref()).await?;
        info!(
            reference = %receipt.reference,
            target_kind = receipt.target.label(),
            target_name = %receipt.target_name,
            "application accepted"
        );
        Ok(receipt)
    }
}
