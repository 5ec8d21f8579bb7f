// src/tests/router_tests/image_tests.rs

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_json, get, media, post_json, test_state, FakeGateway};

fn gateway() -> FakeGateway {
    FakeGateway {
        media: vec![
            media("A1", "https://cdn.example.com/a1-1.jpg", 1),
            media("A1", "https://cdn.example.com/a1-2.jpg", 2),
            media("B2", "https://cdn.example.com/b2-1.jpg", 1),
        ],
        ..Default::default()
    }
}

#[test]
fn batch_returns_every_key() {
    let state = test_state(gateway());
    let req = post_json(
        "/api/images/batch",
        r#"{"listingKeys":["A1","B2","C3"],"size":"medium"}"#,
    );

    let body = body_json(handle(req, &state).unwrap());
    assert_eq!(body["success"], true);
    assert_eq!(body["images"]["A1"].as_array().unwrap().len(), 2);
    assert_eq!(body["images"]["B2"][0], "https://cdn.example.com/b2-1.jpg");
    assert_eq!(body["images"]["C3"], serde_json::json!([]));
}

#[test]
fn batch_respects_limit() {
    let state = test_state(gateway());
    let req = post_json("/api/images/batch", r#"{"listingKeys":["A1"],"limit":1}"#);

    let body = body_json(handle(req, &state).unwrap());
    assert_eq!(
        body["images"]["A1"],
        serde_json::json!(["https://cdn.example.com/a1-1.jpg"])
    );
}

#[test]
fn batch_rejects_empty_and_oversized_key_lists() {
    let state = test_state(gateway());

    let empty = post_json("/api/images/batch", r#"{"listingKeys":[]}"#);
    assert!(matches!(
        handle(empty, &state),
        Err(ServerError::BadRequest(_))
    ));

    let keys: Vec<String> = (0..21).map(|i| format!("\"K{i}\"")).collect();
    let oversized = post_json(
        "/api/images/batch",
        &format!(r#"{{"listingKeys":[{}]}}"#, keys.join(",")),
    );
    assert!(matches!(
        handle(oversized, &state),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn single_lookup_uses_placeholder() {
    let state = test_state(gateway());
    let req = get("/api/images?keys=A1,ZZ");

    let body = body_json(handle(req, &state).unwrap());
    assert_eq!(body["images"]["A1"], "https://cdn.example.com/a1-1.jpg");
    assert_eq!(body["images"]["ZZ"], "/images/placeholder-property.jpg");
}
