//! Integration tests for the dashboard's HTTP API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use std::fs;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use tabdash::app::create_app;
use tabdash::config::Settings;
use tabdash::web::{create_router, AppState};

mod fixtures;
use fixtures::{sample_config_path, temp_dashboard};

/// Creates a test AppState from the fixture dashboard in a temp dir.
fn create_test_state() -> (AppState, TempDir) {
    let (temp_dir, path) = temp_dashboard();
    let settings = Arc::new(Settings::load(&path).expect("Failed to load config"));
    let blocks = create_app(Arc::clone(&settings)).expect("Failed to create app");
    let state = AppState::new(blocks, &settings).expect("Failed to create app state");
    (state, temp_dir)
}

/// Helper to make a GET request and return status and body text.
async fn get_text(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// Helper to make a GET request and parse JSON response.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_text(app, uri).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

/// Helper to make a POST request with JSON body.
async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Id of the first binding listening to `event`.
async fn binding_for(app: &axum::Router, event: &str) -> u64 {
    let (_, json) = get_json(app, "/api/tabs").await;
    json["bindings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["event"] == event)
        .and_then(|b| b["id"].as_u64())
        .unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_index_renders_tabs_in_order() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, html) = get_text(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Test Dashboard</title>"));
    assert!(html.contains(".custom { color: red; }"));
    let main = html.find(">Main</button>").unwrap();
    let about = html.find(">About</button>").unwrap();
    assert!(main < about);
    assert!(html.contains("About this dashboard"));
}

#[tokio::test]
async fn test_list_tabs() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/tabs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Test Dashboard");
    let tabs = json["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0]["title"], "Main");
    assert_eq!(tabs[1]["title"], "About");

    let kinds: Vec<&str> = tabs[0]["widgets"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"textbox"));
    assert!(kinds.contains(&"dropdown"));
    assert!(kinds.contains(&"button"));
    assert!(kinds.contains(&"dataframe"));

    // Only the first tab's widgets are wired.
    let first_tab_ids: Vec<&Value> = tabs[0]["widgets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| &w["id"])
        .collect();
    let bindings = json["bindings"].as_array().unwrap();
    assert!(!bindings.is_empty());
    assert!(bindings.iter().all(|b| first_tab_ids.contains(&&b["trigger"])));
}

// ============================================================================
// Event Dispatch Tests
// ============================================================================

#[tokio::test]
async fn test_evaluate_scores_vacancy() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);
    let id = binding_for(&app, "click").await;

    let (status, json) = post_json(
        &app,
        &format!("/api/events/{id}"),
        json!({ "inputs": ["Strong SQL skills required", ["Databases"]] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updates = json["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["value"], "<h3 class='noti_true'>Done</h3>");
    assert_eq!(updates[1]["value"], json!([["Databases", "50%", "sql"]]));
    assert_eq!(updates[1]["visible"], true);
}

#[tokio::test]
async fn test_evaluate_without_text_shows_notice() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);
    let id = binding_for(&app, "click").await;

    let (status, json) = post_json(
        &app,
        &format!("/api/events/{id}"),
        json!({ "inputs": ["", ["Web"]] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["updates"][0]["value"],
        "<h3 class='noti_err'>Need a vacancy</h3>"
    );
    assert_eq!(json["updates"][1]["visible"], false);
}

#[tokio::test]
async fn test_unknown_binding() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = post_json(&app, "/api/events/999", json!({ "inputs": [] })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_wrong_input_count() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);
    let id = binding_for(&app, "click").await;

    let (status, json) = post_json(
        &app,
        &format!("/api/events/{id}"),
        json!({ "inputs": ["only one"] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

// ============================================================================
// Asset Tests
// ============================================================================

#[tokio::test]
async fn test_embedded_script_is_served() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/assets/app.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("javascript"));
}

#[tokio::test]
async fn test_missing_asset() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, _) = get_text(&app, "/assets/missing.js").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_images_are_served() {
    let (temp_dir, path) = temp_dashboard();
    let images = temp_dir.path().join("images");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("logo.svg"), "<svg></svg>").unwrap();
    let content = fs::read_to_string(&path).unwrap() + "\n[StaticPaths]\nIMAGES = \"images\"\n";
    fs::write(&path, content).unwrap();

    let settings = Arc::new(Settings::load(&path).unwrap());
    let blocks = create_app(Arc::clone(&settings)).unwrap();
    let app = create_router(AppState::new(blocks, &settings).unwrap());

    let (status, body) = get_text(&app, "/static/logo.svg").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<svg></svg>");
}

#[tokio::test]
async fn test_sample_config_builds() {
    let settings = Arc::new(Settings::load(sample_config_path()).unwrap());
    let blocks = create_app(Arc::clone(&settings)).unwrap();
    let app = create_router(AppState::new(blocks, &settings).unwrap());

    let (status, json) = get_json(&app, "/api/tabs").await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = json["tabs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Evaluation", "Requirements", "About"]);
}
