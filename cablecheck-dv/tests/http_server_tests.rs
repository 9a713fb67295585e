//! HTTP server and routing integration tests

mod helpers;

use axum::http::StatusCode;
use cablecheck_dv::build_router;
use helpers::{body_json, get, post_json, test_app_state, StubOracle};
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint_returns_json() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK, "/health should return 200 OK");

    let content_type = response.headers().get("content-type");
    assert!(
        content_type.is_some()
            && content_type.unwrap().to_str().unwrap().contains("application/json"),
        "/health should return JSON"
    );

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cablecheck-dv");
    assert_eq!(body["policy"], "strict");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_validate_route_exists() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state);

    // Empty body is a 4xx, not a missing route
    let response = post_json(app, "/design/validate", json!({})).await;
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_route_exists() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state);

    let response = post_json(app, "/api/settings/oracle_api_key", json!({"api_key": ""})).await;
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_input_channel_is_bad_request() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state);

    let response = post_json(app, "/design/validate", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("exactly one input type"));
}

#[tokio::test]
async fn test_two_input_channels_is_bad_request() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state);

    let response = post_json(
        app,
        "/design/validate",
        json!({
            "designId": "CD-001",
            "freeText": "iec cable",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_values_do_not_count_as_channels() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state);

    // Blank designId plus empty structuredInput: zero real channels
    let response = post_json(
        app,
        "/design/validate",
        json!({
            "designId": "  ",
            "structuredInput": {},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_settings_key_rejected() {
    let state = test_app_state(StubOracle::replying("{}")).await;
    let app = build_router(state.clone());

    let response = post_json(app, "/api/settings/oracle_api_key", json!({"api_key": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing must have been persisted
    let stored = cablecheck_dv::db::settings::get_oracle_api_key(&state.db)
        .await
        .unwrap();
    assert!(stored.is_none());
}
