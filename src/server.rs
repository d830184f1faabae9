//! HTTP layer: JSON API, form fallback and the embedded UI.
//!
//! Endpoints:
//! - GET  /                   - Submission form
//! - GET  /static/style.css   - CSS
//! - GET  /static/app.js      - Client script
//! - POST /api/recommend      - JSON query, JSON array of journals
//! - POST /suggest            - Form query, rendered HTML
//! - GET  /api/info           - Loaded model summary
//! - GET  /health             - Liveness

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use axum::{
    extract::State,
    http::{header, Method},
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Number, Settings};
use crate::corpus::Journal;
use crate::recommend::{Query, Recommender};
use crate::render::render_results;
use crate::static_files::{serve_css, serve_index, serve_js};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub snippet_chars: usize,
}

impl AppState {
    pub fn new(recommender: Arc<Recommender>, snippet_chars: usize) -> Self {
        Self {
            recommender,
            snippet_chars,
        }
    }
}

/// One element of the `/api/recommend` response array.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationDto {
    pub journal: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub similarity_score: Number,
    pub cluster: usize,
    pub metrics: Option<Journal>,
}

pub fn recommend_json(recommender: &Recommender, query: &Query) -> Vec<RecommendationDto> {
    let recommendations = recommender.recommend(query);
    let cluster = recommendations.cluster;
    recommendations
        .journals
        .into_iter()
        .map(|rec| RecommendationDto {
            similarity_score: rec.similarity(),
            journal: rec.journal,
            title: rec.article.title,
            abstract_text: rec.article.abstract_text,
            cluster,
            metrics: rec.metrics,
        })
        .collect()
}

async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    Json(query): Json<Query>,
) -> Json<Vec<RecommendationDto>> {
    let results = recommend_json(&state.recommender, &query);
    info!(results = results.len(), "Recommend request");
    Json(results)
}

async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    Form(query): Form<Query>,
) -> Html<String> {
    let recommendations = state.recommender.recommend(&query);
    info!(
        cluster = recommendations.cluster,
        journals = recommendations.journals.len(),
        "Suggest request"
    );
    Html(render_results(&recommendations, state.snippet_chars))
}

async fn info_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let r = &state.recommender;
    Json(serde_json::json!({
        "name": "journal-recommender",
        "version": env!("CARGO_PKG_VERSION"),
        "vocabulary_size": r.vectorizer().dim(),
        "vectorizer_fingerprint": r.vectorizer().fingerprint(),
        "clusters": r.assigner().k(),
        "articles": r.corpus().len(),
        "journals": r.registry().len(),
        "top_n": r.top_n(),
    }))
}

async fn health_handler() -> &'static str {
    "OK"
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(serve_index))
        .route("/static/style.css", get(serve_css))
        .route("/static/app.js", get(serve_js))
        .route("/api/recommend", post(recommend_handler))
        .route("/api/info", get(info_handler))
        .route("/suggest", post(suggest_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds `host:port`, resolving hostnames such as `localhost`.
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))
}

pub async fn run_server(settings: &Settings, recommender: Arc<Recommender>) -> Result<()> {
    let state = Arc::new(AppState::new(recommender, settings.snippet_chars));
    let app = create_router(state);

    let listener = bind_listener(&settings.host, settings.port).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
