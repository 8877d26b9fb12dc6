use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use campus_compass::applications::{application_router, ApplicationService, SubmissionExecutor};
use campus_compass::discovery::{discovery_router, DiscoveryService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_catalog_routes<E>(
    discovery: Arc<DiscoveryService>,
    applications: Arc<ApplicationService<E>>,
) -> axum::Router
where
    E: SubmissionExecutor + 'static,
{
    discovery_router(discovery)
        .merge(application_router(applications))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use campus_compass::applications::SimulatedSubmission;
    use campus_compass::catalog::CatalogStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let store = CatalogStore::bundled().expect("bundled fixtures parse");
        let discovery = Arc::new(DiscoveryService::new(store.clone()));
        let applications = Arc::new(ApplicationService::new(
            store,
            Arc::new(SimulatedSubmission::new(Duration::ZERO)),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_catalog_routes(discovery, applications).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(status_of(app(false), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        assert_eq!(
            status_of(app(false), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(true), "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn catalog_and_application_routes_are_mounted() {
        assert_eq!(status_of(app(true), "/api/v1/countries").await, StatusCode::OK);
        assert_eq!(
            status_of(app(true), "/api/v1/scholarships?sort=success-rate").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app(true), "/api/v1/courses/medicine").await,
            StatusCode::OK
        );

        let response = app(true)
            .oneshot(
                Request::post("/api/v1/applications/universities/1")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
