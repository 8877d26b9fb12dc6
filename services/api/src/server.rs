use crate::cli::ServeArgs;
use crate::infra::{load_catalog, simulated_executor, AppState};
use crate::routes::with_catalog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_compass::applications::ApplicationService;
use campus_compass::config::AppConfig;
use campus_compass::discovery::{DiscoveryService, SessionRegistry};
use campus_compass::error::AppError;
use campus_compass::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(&config.catalog, std::mem::take(&mut args.sources))?;
    info!(
        universities = catalog.universities().len(),
        scholarships = catalog.scholarships().len(),
        course_categories = catalog.course_categories().len(),
        countries = catalog.countries().len(),
        "catalogs loaded"
    );

    let discovery = Arc::new(DiscoveryService::with_sessions(
        catalog.clone(),
        SessionRegistry::with_idle_ttl(config.sessions.idle_ttl),
    ));
    let applications = Arc::new(ApplicationService::new(
        catalog,
        simulated_executor(&config.submission),
    ));

    let app = with_catalog_routes(discovery, applications)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        submission_delay_ms = config.submission.delay.as_millis() as u64,
        session_idle_secs = config.sessions.idle_ttl.as_secs(),
        "campus compass ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
