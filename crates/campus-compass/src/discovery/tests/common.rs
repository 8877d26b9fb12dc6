use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::catalog::CatalogStore;
use crate::discovery::{discovery_router, DiscoveryService};

pub(super) fn service() -> Arc<DiscoveryService> {
    Arc::new(DiscoveryService::new(
        CatalogStore::bundled().expect("bundled fixtures parse"),
    ))
}

pub(super) fn router_with_service(service: Arc<DiscoveryService>) -> axum::Router {
    discovery_router(service)
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

pub(super) fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::put(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn item_ids(payload: &Value) -> Vec<u64> {
    payload
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_u64))
                .collect()
        })
        .unwrap_or_default()
}
