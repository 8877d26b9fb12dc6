use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn university_listing_applies_query_parameters() {
    let router = router_with_service(service());

    let response = router
        .oneshot(get("/api/v1/universities?q=oxford&country=uk"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("total"), Some(&json!(1)));
    assert_eq!(payload.get("sorted_by"), Some(&json!("ranking")));
    assert_eq!(payload.get("query"), Some(&json!("oxford")));
}

#[tokio::test]
async fn scholarship_listing_sorts_by_requested_key() {
    let router = router_with_service(service());

    let response = router
        .oneshot(get("/api/v1/scholarships?sort=amount-high"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let amounts: Vec<u64> = payload["items"]
        .as_array()
        .expect("items array")
        .iter()
        .filter_map(|item| item.get("amount").and_then(Value::as_u64))
        .collect();
    assert!(!amounts.is_empty());
    assert!(amounts.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn unknown_sort_key_is_a_bad_request() {
    let router = router_with_service(service());

    let response = router
        .oneshot(get("/api/v1/universities?sort=popularity"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("popularity"));
}

#[tokio::test]
async fn malformed_range_returns_empty_listing_with_warning() {
    let router = router_with_service(service());

    let response = router
        .oneshot(get("/api/v1/universities?tuitionRange=cheap"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("total"), Some(&json!(0)));
    assert!(payload.get("empty_state").is_some());
    assert_eq!(payload["warnings"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn missing_catalog_items_are_not_found() {
    let service = service();

    let university = router_with_service(service.clone())
        .oneshot(get("/api/v1/universities/999"))
        .await
        .expect("route executes");
    let subcategory = router_with_service(service)
        .oneshot(get("/api/v1/courses/engineering/astrology"))
        .await
        .expect("route executes");

    assert_eq!(university.status(), StatusCode::NOT_FOUND);
    assert_eq!(subcategory.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_index_lists_ids_and_names() {
    let service = service();

    let response = router_with_service(service.clone())
        .oneshot(get("/api/v1/catalogs/countries"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("index array");
    assert_eq!(entries.len(), service.catalog().countries().len());
    assert!(entries.contains(&json!({
        "kind": "countries",
        "id": "uk",
        "name": "United Kingdom",
    })));

    let unknown = router_with_service(service)
        .oneshot(get("/api/v1/catalogs/testimonials"))
        .await
        .expect("route executes");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(unknown).await;
    assert_eq!(payload["error"], json!("unknown catalog 'testimonials'"));
}

#[tokio::test]
async fn course_subcategory_lookup_includes_parent() {
    let router = router_with_service(service());

    let response = router
        .oneshot(get("/api/v1/courses/engineering/computer-science"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["category"]["id"], json!("engineering"));
    assert_eq!(payload["subcategory"]["id"], json!("computer-science"));
}

#[tokio::test]
async fn session_filters_drive_session_listings() {
    let service = service();

    let opened = router_with_service(service.clone())
        .oneshot(
            Request::post("/api/v1/sessions")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(opened.status(), StatusCode::CREATED);
    let opened = read_json_body(opened).await;
    let session_id = opened["session_id"]
        .as_str()
        .expect("session id")
        .to_string();
    assert_eq!(opened["revision"], json!(0));

    let updated = router_with_service(service.clone())
        .oneshot(put_json(
            &format!("/api/v1/sessions/{session_id}/filters/country"),
            json!({ "value": "germany" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = read_json_body(updated).await;
    assert_eq!(updated["revision"], json!(1));
    assert_eq!(updated["filters"]["country"], json!("germany"));

    let listing = router_with_service(service.clone())
        .oneshot(get(&format!(
            "/api/v1/sessions/{session_id}/scholarships?sort=name"
        )))
        .await
        .expect("route executes");
    assert_eq!(listing.status(), StatusCode::OK);
    let listing = read_json_body(listing).await;
    assert!(!item_ids(&listing).is_empty());
    assert!(listing["items"]
        .as_array()
        .expect("items array")
        .iter()
        .all(|item| item["country"] == json!("germany")));

    let cleared = router_with_service(service)
        .oneshot(
            Request::delete(format!("/api/v1/sessions/{session_id}/filters"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let cleared = read_json_body(cleared).await;
    assert_eq!(cleared["filters"], json!({}));
    assert_eq!(cleared["query"], json!(""));
}

#[tokio::test]
async fn session_routes_reject_bad_ids_and_facets() {
    let service = service();
    let (id, _) = service.open_session();

    let bad_id = router_with_service(service.clone())
        .oneshot(get("/api/v1/sessions/not-a-session"))
        .await
        .expect("route executes");
    let bad_facet = router_with_service(service.clone())
        .oneshot(put_json(
            &format!("/api/v1/sessions/{id}/filters/colour"),
            json!({ "value": "blue" }),
        ))
        .await
        .expect("route executes");

    service.close_session(&id).expect("close succeeds");
    let closed = router_with_service(service)
        .oneshot(get(&format!("/api/v1/sessions/{id}")))
        .await
        .expect("route executes");

    assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
    assert_eq!(bad_facet.status(), StatusCode::BAD_REQUEST);
    assert_eq!(closed.status(), StatusCode::NOT_FOUND);
}
