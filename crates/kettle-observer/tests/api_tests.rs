//! Integration tests for the web control surface.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Heating runs on background tasks under a paused
//! Tokio clock, so simulated seconds pass instantly.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use kettle_core::{KettleModel, NoOpNotifier};
use kettle_observer::build_router;
use kettle_observer::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

fn make_state() -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(KettleModel::default()), Arc::new(NoOpNotifier)).unwrap())
}

async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

async fn get(router: &Router, path: &str) -> Response<Body> {
    send(router, Request::get(path).body(Body::empty()).unwrap()).await
}

async fn post_form(router: &Router, path: &str, body: &str) -> Response<Body> {
    let request = Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(router, request).await
}

fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_owned()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Create a kettle through the form and return its page path.
async fn create(router: &Router, water_amount: &str) -> String {
    let response = post_form(router, "/kettle/new", &format!("water_amount={water_amount}")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
}

async fn snapshot(router: &Router, page: &str) -> Value {
    let id = page.trim_start_matches("/kettle/");
    let response = get(router, &format!("/api/kettles/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_root_redirects_to_form() {
    let router = build_router(make_state());
    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/kettle/new");
}

#[tokio::test]
async fn test_form_renders() {
    let router = build_router(make_state());
    let response = get(&router, "/kettle/new").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"water_amount\""));
    assert!(!html.contains("Please enter a valid number"));
}

#[tokio::test]
async fn test_form_shows_error() {
    let router = build_router(make_state());
    let html = body_text(get(&router, "/kettle/new?error=water_amount").await).await;
    assert!(html.contains("Please enter a valid number for the water amount!"));
}

#[tokio::test]
async fn test_create_registers_kettle() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    let page = create(&router, "0.5").await;
    assert!(page.starts_with("/kettle/"));
    assert_eq!(state.registry.len().await, 1);

    let json = snapshot(&router, &page).await;
    assert_eq!(json["status"], "OFF");
    assert_eq!(json["temperature"], 20.0);
    assert_eq!(json["water_amount"], 0.5);
    assert_eq!(json["broken"], false);
}

#[tokio::test]
async fn test_registry_survives_new_form_visits() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    let first = create(&router, "0.3").await;
    let _ = get(&router, "/kettle/new").await;
    let second = create(&router, "0.7").await;

    assert_ne!(first, second);
    assert_eq!(state.registry.len().await, 2);
    assert_eq!(get(&router, &first).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_kettles_returns_every_snapshot() {
    let router = build_router(make_state());

    let response = get(&router, "/api/kettles").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Array(Vec::new()));

    let first = create(&router, "0.3").await;
    let second = create(&router, "0.7").await;

    let json = body_json(get(&router, "/api/kettles").await).await;
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 2);

    let mut ids: Vec<String> = listed
        .iter()
        .map(|k| format!("/kettle/{}", k["id"].as_str().unwrap()))
        .collect();
    ids.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(listed.iter().all(|k| k["status"] == "OFF"));
}

#[tokio::test]
async fn test_invalid_water_amount_redirects_back() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    for input in ["abc", "1.5", "-1", ""] {
        let response = post_form(&router, "/kettle/new", &format!("water_amount={input}")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/kettle/new?error=water_amount");
    }
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn test_kettle_page_renders() {
    let router = build_router(make_state());
    let page = create(&router, "0.5").await;

    let response = get(&router, &page).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Bosch TWK 7603"));
    assert!(html.contains("Status: OFF"));
    assert!(html.contains("value=\"Turn On\""));
}

#[tokio::test]
async fn test_unknown_kettle_is_not_found() {
    let router = build_router(make_state());
    let unknown = uuid::Uuid::now_v7();

    assert_eq!(
        get(&router, &format!("/kettle/{unknown}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&router, "/kettle/not-a-uuid").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&router, &format!("/api/kettles/{unknown}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        post_form(&router, &format!("/kettle/{unknown}"), "switch_status=Turn+On")
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_unknown_switch_value_is_rejected() {
    let router = build_router(make_state());
    let page = create(&router, "0.5").await;

    let response = post_form(&router, &page, "switch_status=Explode").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(snapshot(&router, &page).await["status"], "OFF");
}

#[tokio::test(start_paused = true)]
async fn test_turn_on_boils_in_background() {
    let router = build_router(make_state());
    let page = create(&router, "0.5").await;

    let response = post_form(&router, &page, "switch_status=Turn+On").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), page);

    let json = snapshot(&router, &page).await;
    assert_eq!(json["status"], "ON");
    assert_eq!(json["heating"], true);

    tokio::time::sleep(Duration::from_secs(30)).await;

    let json = snapshot(&router, &page).await;
    assert_eq!(json["status"], "OFF");
    assert_eq!(json["heating"], false);
    assert_eq!(json["temperature"], 100.0);
}

#[tokio::test(start_paused = true)]
async fn test_turn_off_interrupts_heating() {
    let router = build_router(make_state());
    let page = create(&router, "0.5").await;

    let _ = post_form(&router, &page, "switch_status=Turn+On").await;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    let _ = post_form(&router, &page, "switch_status=Turn+Off").await;

    let json = snapshot(&router, &page).await;
    assert_eq!(json["status"], "OFF");
    let stopped_at = json["temperature"].as_f64().unwrap();
    assert!(stopped_at < 100.0);

    // No step may follow the OFF the request observed.
    tokio::time::sleep(Duration::from_secs(30)).await;
    let json = snapshot(&router, &page).await;
    assert_eq!(json["temperature"].as_f64().unwrap(), stopped_at);
    assert_eq!(json["status"], "OFF");
}

#[tokio::test(start_paused = true)]
async fn test_repeated_switch_requests_are_idempotent() {
    let router = build_router(make_state());
    let page = create(&router, "0.5").await;

    let _ = post_form(&router, &page, "switch_status=Turn+Off").await;
    assert_eq!(snapshot(&router, &page).await["status"], "OFF");

    let _ = post_form(&router, &page, "switch_status=Turn+On").await;
    let _ = post_form(&router, &page, "switch_status=Turn+On").await;
    assert_eq!(snapshot(&router, &page).await["status"], "ON");

    let _ = post_form(&router, &page, "switch_status=Turn+Off").await;
    let _ = post_form(&router, &page, "switch_status=Turn+Off").await;
    assert_eq!(snapshot(&router, &page).await["status"], "OFF");
}

#[tokio::test]
async fn test_empty_kettle_breaks() {
    let router = build_router(make_state());
    let page = create(&router, "0").await;

    let _ = post_form(&router, &page, "switch_status=Turn+On").await;
    let json = snapshot(&router, &page).await;
    assert_eq!(json["broken"], true);
    assert_eq!(json["heating"], false);
    assert_eq!(json["temperature"], 20.0);

    let html = body_text(get(&router, &page).await).await;
    assert!(html.contains("broke it"));
}
