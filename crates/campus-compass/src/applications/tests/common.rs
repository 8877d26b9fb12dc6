use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::applications::{
    application_router, ApplicationService, ScholarshipApplication, SimulatedSubmission,
    SubmissionError, SubmissionExecutor, SubmissionReceipt, SubmissionRequest,
    UniversityApplication,
};
use crate::catalog::CatalogStore;

/// Executor that always fails, counting attempts.
#[derive(Debug, Default)]
pub(super) struct OfflineInbox {
    attempts: AtomicUsize,
}

impl OfflineInbox {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionExecutor for OfflineInbox {
    async fn submit(
        &self,
        _request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SubmissionError::Transient("admissions inbox offline".to_string()))
    }
}

pub(super) fn catalog() -> CatalogStore {
    CatalogStore::bundled().expect("bundled fixtures parse")
}

pub(super) fn instant_service() -> Arc<ApplicationService<SimulatedSubmission>> {
    Arc::new(ApplicationService::new(
        catalog(),
        Arc::new(SimulatedSubmission::new(Duration::ZERO)),
    ))
}

pub(super) fn offline_service() -> (Arc<ApplicationService<OfflineInbox>>, Arc<OfflineInbox>) {
    let inbox = Arc::new(OfflineInbox::default());
    let service = Arc::new(ApplicationService::new(catalog(), inbox.clone()));
    (service, inbox)
}

pub(super) fn router_with_service<E>(service: Arc<ApplicationService<E>>) -> axum::Router
where
    E: SubmissionExecutor + 'static,
{
    application_router(service)
}

pub(super) fn university_form() -> UniversityApplication {
    UniversityApplication {
        first_name: "Amara".to_string(),
        last_name: "Obi".to_string(),
        email: "amara@example.com".to_string(),
        phone: "+234 803 555 0101".to_string(),
        date_of_birth: "2001-04-12".to_string(),
        nationality: "Nigerian".to_string(),
        current_education_level: "Bachelor's".to_string(),
        current_gpa: "3.6".to_string(),
        desired_program: "MSc Computer Science".to_string(),
        intake_preference: "Fall 2025".to_string(),
        english_test: "IELTS".to_string(),
        english_score: "7.5".to_string(),
        ..UniversityApplication::default()
    }
}

pub(super) fn essay(chars: usize) -> String {
    "a".repeat(chars)
}

pub(super) fn scholarship_form() -> ScholarshipApplication {
    ScholarshipApplication {
        first_name: "Lukas".to_string(),
        last_name: "Berg".to_string(),
        email: "lukas.berg@example.de".to_string(),
        phone: "(030) 555-0199".to_string(),
        date_of_birth: "1999-09-30".to_string(),
        nationality: "German".to_string(),
        current_education_level: "Master's".to_string(),
        field_of_study: "Mechanical Engineering".to_string(),
        current_gpa: "3.9".to_string(),
        why_deserve: essay(140),
        career_goals: essay(100),
        ..ScholarshipApplication::default()
    }
}

pub(super) fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializes")))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
