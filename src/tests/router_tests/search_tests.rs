// src/tests/router_tests/search_tests.rs

use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::{body_json, listing, media, post_json, test_state, FakeGateway};

fn five_listings() -> FakeGateway {
    FakeGateway {
        properties: (1..=5).map(|i| listing(&format!("C10000{i}"))).collect(),
        media: vec![media("C100001", "https://cdn.example.com/c100001.jpg", 1)],
        ..Default::default()
    }
}

#[test]
fn search_returns_formatted_page() {
    let state = test_state(five_listings());
    let req = post_json("/api/search", r#"{"query":"Toronto","pageSize":2}"#);

    let resp = handle(req, &state).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["hasMore"], true);
    assert!(body.get("mapProperties").is_none());

    let first = &body["properties"][0];
    assert_eq!(first["listingKey"], "C100001");
    assert_eq!(first["price"], 849000);
    assert_eq!(first["formatted_status"], "For Sale");
    assert_eq!(first["imageUrl"], "https://cdn.example.com/c100001.jpg");
    assert_eq!(body["properties"][1]["imageUrl"], serde_json::Value::Null);
}

#[test]
fn listings_search_includes_map_properties() {
    let state = test_state(five_listings());
    let req = post_json(
        "/api/search",
        r#"{"query":"Toronto","pageSize":2,"searchType":"listings"}"#,
    );

    let body = body_json(handle(req, &state).unwrap());
    assert_eq!(body["properties"].as_array().unwrap().len(), 2);
    assert_eq!(body["mapProperties"].as_array().unwrap().len(), 4);
}

#[test]
fn last_page_has_no_more() {
    let state = test_state(five_listings());
    let req = post_json("/api/search", r#"{"page":3,"pageSize":2}"#);

    let body = body_json(handle(req, &state).unwrap());
    assert_eq!(body["properties"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasMore"], false);
}

#[test]
fn provider_failure_becomes_502_json() {
    let state = test_state(FakeGateway {
        fail_properties: true,
        ..Default::default()
    });
    let req = post_json("/api/search", r#"{"query":"Yorkville"}"#);

    let err = handle(req, &state).unwrap_err();
    assert!(matches!(err, ServerError::Provider(_)));

    let resp = error_to_response(err);
    assert_eq!(resp.status(), 502);
    let body = body_json(resp);
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Search failed:"));
}

#[test]
fn malformed_body_is_bad_request() {
    let state = test_state(FakeGateway::default());
    let req = post_json("/api/search", "{not json");

    let resp = error_to_response(handle(req, &state).unwrap_err());
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["success"], false);
}

#[test]
fn inverted_viewport_is_bad_request() {
    let state = test_state(FakeGateway::default());
    let req = post_json(
        "/api/search",
        r#"{"viewportBounds":{"north":43.5,"south":43.9,"east":-79.2,"west":-79.6}}"#,
    );

    assert!(matches!(
        handle(req, &state),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state(FakeGateway::default());
    let req = post_json("/api/nope", "{}");

    let resp = error_to_response(handle(req, &state).unwrap_err());
    assert_eq!(resp.status(), 404);
}
