//! Application forms for universities and scholarships: field validation,
//! drafts with a submission lifecycle, and a swappable delivery executor.

pub mod domain;
pub mod draft;
pub mod executor;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicReference, ApplicationForm, ApplicationTarget, ProfessionalReference, References,
    ScholarshipApplication, ScholarshipDocuments, UniversityApplication, UniversityDocuments,
};
pub use draft::{ApplicationDraft, SubmissionStatus};
pub use executor::{
    SimulatedSubmission, SubmissionError, SubmissionExecutor, SubmissionReceipt,
    SubmissionRequest, DEFAULT_SUBMISSION_DELAY,
};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
pub use validation::{
    is_valid_email, is_valid_gpa, is_valid_phone, scholarship_rules, university_rules,
    ValidationErrorMap, ValidationRules, ESSAY_MIN_CHARS,
};
