use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::DiscoveryService;
use super::session::{FilterSnapshot, SessionError, SessionId};
use super::sort::{ScholarshipSort, UniversitySort, UnknownSortKey};
use super::state::{Facet, FilterState, UnknownFacet};
use crate::catalog::{CatalogKind, UnknownCatalogKind};

/// Router builder exposing catalog lookups, stateless listings, and browsing sessions.
pub fn discovery_router(service: Arc<DiscoveryService>) -> Router {
    Router::new()
        .route("/api/v1/universities", get(universities_handler))
        .route("/api/v1/universities/:id", get(university_handler))
        .route("/api/v1/scholarships", get(scholarships_handler))
        .route("/api/v1/scholarships/:id", get(scholarship_handler))
        .route("/api/v1/countries", get(countries_handler))
        .route("/api/v1/countries/:id", get(country_handler))
        .route("/api/v1/catalogs/:kind", get(catalog_index_handler))
        .route("/api/v1/courses", get(courses_handler))
        .route("/api/v1/courses/:category", get(course_category_handler))
        .route(
            "/api/v1/courses/:category/:subcategory",
            get(course_subcategory_handler),
        )
        .route("/api/v1/sessions", axum::routing::post(open_session_handler))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler).delete(close_session_handler),
        )
        .route("/api/v1/sessions/:session_id/query", put(set_query_handler))
        .route(
            "/api/v1/sessions/:session_id/filters",
            axum::routing::delete(clear_filters_handler),
        )
        .route(
            "/api/v1/sessions/:session_id/filters/:facet",
            put(set_filter_handler),
        )
        .route(
            "/api/v1/sessions/:session_id/universities",
            get(session_universities_handler),
        )
        .route(
            "/api/v1/sessions/:session_id/scholarships",
            get(session_scholarships_handler),
        )
        .with_state(service)
}

/// Error surfaced by discovery endpoints.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Sort(#[from] UnknownSortKey),
    #[error(transparent)]
    Facet(#[from] UnknownFacet),
    #[error(transparent)]
    Catalog(#[from] UnknownCatalogKind),
    #[error("{0} not found")]
    NotFound(String),
}

impl IntoResponse for DiscoveryError {
    fn into_response(self) -> Response {
        let status = match &self {
            DiscoveryError::Session(SessionError::NotFound(_))
            | DiscoveryError::Catalog(_)
            | DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
            DiscoveryError::Session(SessionError::InvalidId(_))
            | DiscoveryError::Sort(_)
            | DiscoveryError::Facet(_) => StatusCode::BAD_REQUEST,
        };

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UniversityParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    course: Option<String>,
    #[serde(default, alias = "tuitionRange")]
    tuition_range: Option<String>,
    #[serde(default)]
    ranking: Option<String>,
    #[serde(default)]
    sort: Option<String>,
}

impl UniversityParams {
    fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        state.set_query(self.q.clone().unwrap_or_default());
        apply(&mut state, Facet::Country, &self.country);
        apply(&mut state, Facet::Course, &self.course);
        apply(&mut state, Facet::TuitionRange, &self.tuition_range);
        apply(&mut state, Facet::Ranking, &self.ranking);
        state
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScholarshipParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default, alias = "degreeLevel")]
    degree_level: Option<String>,
    #[serde(default, alias = "scholarshipType", alias = "type")]
    scholarship_type: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    sort: Option<String>,
}

impl ScholarshipParams {
    fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        state.set_query(self.q.clone().unwrap_or_default());
        apply(&mut state, Facet::Country, &self.country);
        apply(&mut state, Facet::DegreeLevel, &self.degree_level);
        apply(&mut state, Facet::ScholarshipType, &self.scholarship_type);
        apply(&mut state, Facet::Amount, &self.amount);
        state
    }
}

fn apply(state: &mut FilterState, facet: Facet, value: &Option<String>) {
    if let Some(value) = value {
        state.set_filter(facet, value.clone());
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SortParams {
    #[serde(default)]
    sort: Option<String>,
}

fn parse_sort<K>(raw: Option<&str>) -> Result<K, UnknownSortKey>
where
    K: std::str::FromStr<Err = UnknownSortKey> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(K::default()),
        Some(value) => value.parse(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryBody {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilterBody {
    #[serde(default)]
    value: String,
}

fn snapshot_body(id: SessionId, snapshot: &FilterSnapshot) -> serde_json::Value {
    json!({
        "session_id": id,
        "revision": snapshot.revision,
        "query": snapshot.state.query(),
        "filters": snapshot.state.filters(),
    })
}

pub(crate) async fn universities_handler(
    State(service): State<Arc<DiscoveryService>>,
    Query(params): Query<UniversityParams>,
) -> Result<Response, DiscoveryError> {
    let sort: UniversitySort = parse_sort(params.sort.as_deref())?;
    let state = params.filter_state();
    Ok(Json(service.universities(&state, sort)).into_response())
}

pub(crate) async fn scholarships_handler(
    State(service): State<Arc<DiscoveryService>>,
    Query(params): Query<ScholarshipParams>,
) -> Result<Response, DiscoveryError> {
    let sort: ScholarshipSort = parse_sort(params.sort.as_deref())?;
    let state = params.filter_state();
    Ok(Json(service.scholarships(&state, sort)).into_response())
}

pub(crate) async fn university_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(id): Path<u32>,
) -> Result<Response, DiscoveryError> {
    let university = service
        .catalog()
        .university(id)
        .ok_or_else(|| DiscoveryError::NotFound(format!("university {id}")))?;
    Ok(Json(university).into_response())
}

pub(crate) async fn scholarship_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(id): Path<u32>,
) -> Result<Response, DiscoveryError> {
    let scholarship = service
        .catalog()
        .scholarship(id)
        .ok_or_else(|| DiscoveryError::NotFound(format!("scholarship {id}")))?;
    Ok(Json(scholarship).into_response())
}

pub(crate) async fn countries_handler(State(service): State<Arc<DiscoveryService>>) -> Response {
    Json(service.catalog().countries()).into_response()
}

pub(crate) async fn country_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(id): Path<String>,
) -> Result<Response, DiscoveryError> {
    let country = service
        .catalog()
        .country(&id)
        .ok_or_else(|| DiscoveryError::NotFound(format!("country '{id}'")))?;
    Ok(Json(country).into_response())
}

pub(crate) async fn catalog_index_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(kind): Path<String>,
) -> Result<Response, DiscoveryError> {
    let kind: CatalogKind = kind.parse()?;
    Ok(Json(service.index(kind)).into_response())
}

pub(crate) async fn courses_handler(State(service): State<Arc<DiscoveryService>>) -> Response {
    Json(service.catalog().course_categories()).into_response()
}

pub(crate) async fn course_category_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(category): Path<String>,
) -> Result<Response, DiscoveryError> {
    let category = service
        .catalog()
        .course_category(&category)
        .ok_or_else(|| DiscoveryError::NotFound(format!("course category '{category}'")))?;
    Ok(Json(category).into_response())
}

pub(crate) async fn course_subcategory_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path((category, subcategory)): Path<(String, String)>,
) -> Result<Response, DiscoveryError> {
    let parent = service
        .catalog()
        .course_category(&category)
        .ok_or_else(|| DiscoveryError::NotFound(format!("course category '{category}'")))?;
    let child = parent.subcategory(&subcategory).ok_or_else(|| {
        DiscoveryError::NotFound(format!("subcategory '{subcategory}' of '{category}'"))
    })?;

    Ok(Json(json!({
        "category": { "id": parent.id, "name": parent.name },
        "subcategory": child,
    }))
    .into_response())
}

pub(crate) async fn open_session_handler(State(service): State<Arc<DiscoveryService>>) -> Response {
    let (id, snapshot) = service.open_session();
    (StatusCode::CREATED, Json(snapshot_body(id, &snapshot))).into_response()
}

pub(crate) async fn session_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(session_id): Path<String>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    let snapshot = service.session(&id)?.snapshot();
    Ok(Json(snapshot_body(id, &snapshot)).into_response())
}

pub(crate) async fn close_session_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(session_id): Path<String>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    service.close_session(&id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn set_query_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(session_id): Path<String>,
    Json(body): Json<QueryBody>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    let snapshot = service.session(&id)?.set_query(body.query);
    Ok(Json(snapshot_body(id, &snapshot)).into_response())
}

pub(crate) async fn set_filter_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path((session_id, facet)): Path<(String, String)>,
    Json(body): Json<FilterBody>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    let facet: Facet = facet.parse()?;
    let snapshot = service.session(&id)?.set_filter(facet, body.value);
    Ok(Json(snapshot_body(id, &snapshot)).into_response())
}

pub(crate) async fn clear_filters_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(session_id): Path<String>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    let snapshot = service.session(&id)?.clear_all();
    Ok(Json(snapshot_body(id, &snapshot)).into_response())
}

pub(crate) async fn session_universities_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(session_id): Path<String>,
    Query(params): Query<SortParams>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    let sort: UniversitySort = parse_sort(params.sort.as_deref())?;
    let listing = service.session_universities(&id, sort)?;
    Ok(Json(listing).into_response())
}

pub(crate) async fn session_scholarships_handler(
    State(service): State<Arc<DiscoveryService>>,
    Path(session_id): Path<String>,
    Query(params): Query<SortParams>,
) -> Result<Response, DiscoveryError> {
    let id: SessionId = session_id.parse()?;
    let sort: ScholarshipSort = parse_sort(params.sort.as_deref())?;
    let listing = service.session_scholarships(&id, sort)?;
    Ok(Json(listing).into_response())
}
