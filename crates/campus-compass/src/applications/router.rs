use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::{ScholarshipApplication, UniversityApplication};
use super::executor::{SubmissionExecutor, SubmissionReceipt};
use super::service::{ApplicationService, ApplicationServiceError};

/// Router builder exposing application intake endpoints.
pub fn application_router<E>(service: Arc<ApplicationService<E>>) -> Router
where
    E: SubmissionExecutor + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/universities/:university_id",
            post(university_handler::<E>),
        )
        .route(
            "/api/v1/applications/scholarships/:scholarship_id",
            post(scholarship_handler::<E>),
        )
        .with_state(service)
}

pub(crate) async fn university_handler<E>(
    State(service): State<Arc<ApplicationService<E>>>,
    Path(university_id): Path<u32>,
    axum::Json(form): axum::Json<UniversityApplication>,
) -> Response
where
    E: SubmissionExecutor + 'static,
{
    respond(service.apply_to_university(university_id, form).await)
}

pub(crate) async fn scholarship_handler<E>(
    State(service): State<Arc<ApplicationService<E>>>,
    Path(scholarship_id): Path<u32>,
    axum::Json(form): axum::Json<ScholarshipApplication>,
) -> Response
where
    E: SubmissionExecutor + 'static,
{
    respond(service.apply_for_scholarship(scholarship_id, form).await)
}

fn respond(result: Result<SubmissionReceipt, ApplicationServiceError>) -> Response {
    match result {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(receipt)).into_response(),
        Err(ApplicationServiceError::Invalid(errors)) => {
            let payload = json!({
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ ApplicationServiceError::UnknownTarget(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error @ ApplicationServiceError::Submission(_)) => {
            let payload = json!({
                "error": error.to_string(),
                "retryable": true,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
