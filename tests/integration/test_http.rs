//! HTTP surface tests driven through the router without binding a socket.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use jrec::server::{bind_listener, create_router, AppState};
use jrec::Recommender;

use crate::fixtures::fixture_dir;

fn app() -> Router {
    let (_dir, settings) = fixture_dir();
    // artifacts are fully read during load, so the directory can go
    let recommender = Arc::new(Recommender::load(&settings).unwrap());
    create_router(Arc::new(AppState::new(recommender, settings.snippet_chars)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_recommend_returns_json_array() {
    let body = r#"{"title": "Protein folding dynamics",
                   "abstract": "Molecular dynamics of protein folding and enzyme activity",
                   "keywords": "protein"}"#;
    let (status, text) = send(app(), post_json("/api/recommend", body)).await;
    assert_eq!(status, StatusCode::OK);

    let records: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["journal"], "Bioinformatics");
    assert_eq!(records[0]["title"], "Protein folding dynamics");
    assert!(records[0]["abstract"].as_str().unwrap().starts_with("Molecular dynamics"));
    assert_eq!(records[0]["cluster"], 1);
    assert_eq!(records[0]["metrics"]["h_index"], 300);

    for record in &records {
        let score = record["similarity_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));
    }
}

#[tokio::test]
async fn test_recommend_unlisted_journal_has_null_metrics() {
    let body = r#"{"title": "graph learning", "abstract": "", "keywords": ""}"#;
    let (status, text) = send(app(), post_json("/api/recommend", body)).await;
    assert_eq!(status, StatusCode::OK);

    let records: Vec<Value> = serde_json::from_str(&text).unwrap();
    let unlisted = records
        .iter()
        .find(|r| r["journal"] == "Unlisted Proceedings")
        .unwrap();
    assert!(unlisted["metrics"].is_null());
}

#[tokio::test]
async fn test_recommend_empty_query_is_not_an_error() {
    let (status, text) = send(app(), post_json("/api/recommend", "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn test_recommend_rejects_malformed_json() {
    let (status, _) = send(app(), post_json("/api/recommend", "{not json")).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_suggest_form_renders_html() {
    let request = Request::builder()
        .method("POST")
        .uri("/suggest")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("title=neural+network&abstract=&keywords=pruning"))
        .unwrap();
    let (status, html) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Recommended journals"));
    assert!(html.contains("Machine Learning Letters"));
    assert!(html.contains("Similar articles"));
    assert!(html.contains('%'));
}

#[tokio::test]
async fn test_index_and_assets() {
    let (status, html) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("id=\"suggest-form\""));
    assert!(html.contains("/static/app.js"));

    let response = app().oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("application/javascript"));

    let (status, css) = send(app(), get("/static/style.css")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(css.contains(".result"));
}

#[tokio::test]
async fn test_health_and_info() {
    let (status, text) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");

    let (status, text) = send(app(), get("/api/info")).await;
    assert_eq!(status, StatusCode::OK);
    let info: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(info["clusters"], 3);
    assert_eq!(info["articles"], 6);
    assert_eq!(info["journals"], 4);
    assert_eq!(info["vocabulary_size"], 10);
}

#[tokio::test]
async fn test_bind_accepts_hostnames() {
    let listener = bind_listener("localhost", 0).await.unwrap();
    assert!(listener.local_addr().unwrap().ip().is_loopback());

    assert!(bind_listener("127.0.0.1", 0).await.is_ok());
    assert!(bind_listener("no such host", 0).await.is_err());
}
