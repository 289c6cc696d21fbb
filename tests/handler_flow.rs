//! End-to-end flow through the production router, middleware and hit worker.

mod common;

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use urlsh::domain::hit_worker::run_hit_worker;
use urlsh::domain::repositories::UrlStore;
use urlsh::routes::app_router;

fn app() -> (TestServer, JoinHandle<()>) {
    let store = common::create_test_store();
    let (state, rx) =
        common::create_test_state_with(store.clone(), 100, Some("https://sho.rt"));
    let worker = tokio::spawn(run_hit_worker(rx, store as Arc<dyn UrlStore>, 2));

    let service = ServiceExt::<Request>::into_make_service(app_router(state));

    (TestServer::new(service).unwrap(), worker)
}

async fn hits_for(server: &TestServer, code: &str) -> Option<u64> {
    let body: Vec<Value> = server.get("/api/stats").await.json();

    body.iter()
        .find(|item| item["code"] == code)
        .and_then(|item| item["hits"].as_u64())
}

#[tokio::test]
async fn test_shorten_redirect_and_count() {
    let (server, worker) = app();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a?x=1" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let code = body["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 7);
    assert_eq!(body["hits"], 0);
    assert_eq!(body["shortUrl"], format!("https://sho.rt/{code}"));

    let redirect = server.get(&format!("/{code}")).await;
    assert_eq!(redirect.status_code(), 301);
    assert_eq!(redirect.header("location"), "https://example.com/a?x=1");

    let again: Value = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a?x=1" }))
        .await
        .json();
    assert_eq!(again["code"], code.as_str());

    let counted = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if hits_for(&server, &code).await == Some(1) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(counted.is_ok(), "hit was never applied");

    worker.abort();
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let (server, worker) = app();
    let body: Value = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/" }))
        .await
        .json();
    let code = body["code"].as_str().unwrap();

    let redirect = server.get(&format!("/{code}/")).await;

    assert_eq!(redirect.status_code(), 301);
    assert_eq!(redirect.header("location"), "https://example.com/");
    server.get("/api/stats/").await.assert_status_ok();

    worker.abort();
}

#[tokio::test]
async fn test_unsupported_scheme_is_rejected() {
    let (server, worker) = app();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_input");

    worker.abort();
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let (server, worker) = app();

    let response = server.get("/nothere").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");

    worker.abort();
}

#[tokio::test]
async fn test_fixed_routes_win_over_code_capture() {
    let (server, worker) = app();

    let health = server.get("/health").await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");

    let stats = server.get("/api/stats").await;
    stats.assert_status_ok();
    assert_eq!(stats.json::<Value>(), Value::Array(vec![]));

    worker.abort();
}
