// src/tests/router_tests/property_tests.rs

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_json, get, listing, media, test_state, FakeGateway};

#[test]
fn health_check() {
    let state = test_state(FakeGateway::default());
    let body = body_json(handle(get("/health"), &state).unwrap());
    assert_eq!(body["status"], "ok");
}

#[test]
fn viewport_city_resolves_bounds() {
    let state = test_state(FakeGateway::default());
    let req = get("/api/viewport-city?north=43.70&south=43.60&east=-79.30&west=-79.45");

    let body = body_json(handle(req, &state).unwrap());
    assert_eq!(body["city"], "Toronto");
}

#[test]
fn viewport_city_rejects_bad_bounds() {
    let state = test_state(FakeGateway::default());

    let missing = get("/api/viewport-city?north=43.70&south=43.60");
    assert!(matches!(
        handle(missing, &state),
        Err(ServerError::BadRequest(_))
    ));

    let inverted = get("/api/viewport-city?north=43.60&south=43.70&east=-79.30&west=-79.45");
    assert!(matches!(
        handle(inverted, &state),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn property_detail_by_slug() {
    let state = test_state(FakeGateway {
        properties: vec![listing("C1234567"), listing("C7654321")],
        media: vec![
            media("C1234567", "https://cdn.example.com/c1234567-1.jpg", 1),
            media("C1234567", "https://cdn.example.com/c1234567-2.jpg", 2),
        ],
        ..Default::default()
    });
    let req = get("/api/properties/65-bremner-blvd-toronto-c1234567");

    let resp = handle(req, &state).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["property"]["listingKey"], "C1234567");
    assert_eq!(body["property"]["slug"], "65-bremner-blvd-toronto-c1234567");
    assert_eq!(body["property"]["images"].as_array().unwrap().len(), 2);
}

#[test]
fn property_detail_not_found() {
    let state = test_state(FakeGateway {
        properties: vec![listing("C1234567")],
        ..Default::default()
    });

    assert!(matches!(
        handle(get("/api/properties/X9999999"), &state),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        handle(get("/api/properties/no-key-here"), &state),
        Err(ServerError::NotFound)
    ));
}
