//! HTTP-level integration tests for the admin event endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, data_ids, get, send, ADMIN_TOKEN};
use serde_json::json;

fn new_event() -> serde_json::Value {
    json!({
        "title": "Harbour lights walk",
        "start_time": (chrono::Utc::now() + chrono::Duration::days(2)).to_rfc3339(),
        "category": "outdoors",
        "location": "Harbour front",
        "image_url": "https://img.example.com/harbour.jpg"
    })
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = common::build_test_app(common::three_events()).await;

    let response = get(&app, "/api/v1/admin/events").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let app = common::build_test_app(common::three_events()).await;

    let response = send(&app, Method::GET, "/api/v1/admin/events", None, Some("nope")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_disabled_without_configured_token() {
    let mut config = common::test_config();
    config.admin_token = None;
    let app = common::build_test_app_with(common::three_events(), config).await;

    let response = send(
        &app,
        Method::GET,
        "/api/v1/admin/events",
        None,
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Admin access is disabled");
}

#[tokio::test]
async fn test_create_with_wrong_token_stores_nothing() {
    let app = common::build_test_app(vec![]).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/admin/events",
        Some(new_event()),
        Some("nope"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(data_ids(&body_json(get(&app, "/api/v1/events").await).await).is_empty());
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_includes_past_events() {
    let app = common::build_test_app(vec![common::event("past", -3), common::event("next", 3)])
        .await;

    let response = send(&app, Method::GET, "/api/v1/admin/events", None, Some(ADMIN_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data_ids(&body_json(response).await), vec!["past", "next"]);
}

#[tokio::test]
async fn test_create_returns_201_and_is_listed() {
    let app = common::build_test_app(vec![]).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/admin/events",
        Some(new_event()),
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["title"], "Harbour lights walk");
    assert_eq!(created["data"]["is_free"], true);
    assert_eq!(created["data"]["category"], "outdoors");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let listed = body_json(get(&app, "/api/v1/events").await).await;
    assert_eq!(data_ids(&listed), vec![id]);
}

#[tokio::test]
async fn test_create_invalid_returns_422_with_fields() {
    let app = common::build_test_app(vec![]).await;

    let mut body = new_event();
    body["title"] = json!("");
    body["is_free"] = json!(false);
    body["ticket_url"] = json!("not-a-url");

    let response = send(
        &app,
        Method::POST,
        "/api/v1/admin/events",
        Some(body),
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_FIELDS");
    assert!(json["fields"]["title"].is_array());
    assert!(json["fields"]["price"].is_array());
    assert_eq!(json["fields"]["ticket_url"][0], "Ticket URL must be a valid URL");
}

#[tokio::test]
async fn test_update_merges_fields() {
    let app = common::build_test_app(common::three_events()).await;

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/admin/events/a",
        Some(json!({"is_free": false, "price": "$12"})),
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["price"], "$12");
    assert_eq!(json["data"]["title"], "Event a");
}

#[tokio::test]
async fn test_update_with_null_clears_category() {
    let app = common::build_test_app(vec![]).await;

    let created = body_json(
        send(
            &app,
            Method::POST,
            "/api/v1/admin/events",
            Some(new_event()),
            Some(ADMIN_TOKEN),
        )
        .await,
    )
    .await;
    let uri = format!("/api/v1/admin/events/{}", created["data"]["id"].as_str().unwrap());

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"category": null})),
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["category"].is_null());
    assert_eq!(json["data"]["location"], "Harbour front");
}

#[tokio::test]
async fn test_update_unknown_returns_404() {
    let app = common::build_test_app(common::three_events()).await;

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/admin/events/ghost",
        Some(json!({"title": "New"})),
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let app = common::build_test_app(common::three_events()).await;

    let response = send(&app, Method::DELETE, "/api/v1/admin/events/b", None, Some(ADMIN_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/api/v1/admin/events/b", None, Some(ADMIN_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::DELETE, "/api/v1/admin/events/b", None, Some(ADMIN_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
