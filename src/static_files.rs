//! Static assets for the web UI, embedded in the binary.

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
    response::IntoResponse,
};

/// CSS styles for the web UI.
pub const CSS: &str = r#"
:root {
    --bg: #f8fafc;
    --card: #ffffff;
    --text: #0f172a;
    --muted: #64748b;
    --accent: #2563eb;
    --border: #e2e8f0;
}

* { box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
    background: var(--bg);
    color: var(--text);
    margin: 0;
    line-height: 1.5;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 24px;
}

form label {
    display: block;
    font-weight: 600;
    margin-top: 16px;
}

form input, form textarea {
    width: 100%;
    padding: 10px 12px;
    border: 1px solid var(--border);
    border-radius: 6px;
    font-size: 1rem;
}

form textarea { min-height: 160px; }

button {
    margin-top: 20px;
    padding: 10px 24px;
    background: var(--accent);
    color: white;
    border: none;
    border-radius: 6px;
    font-size: 1rem;
    cursor: pointer;
}

.result {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 16px;
    margin-bottom: 12px;
}

.result h3 { margin: 0 8px 4px 0; display: inline-block; }
.score { color: var(--accent); font-weight: 700; }
.metrics { color: var(--muted); font-size: 0.875rem; }
.metric { margin-right: 14px; }
.snippet { color: var(--muted); }
.empty { color: var(--muted); font-style: italic; }
"#;

/// Client script: posts the form as JSON and renders the returned records.
pub const JS: &str = r#"
const SNIPPET_CHARS = 200;

function escapeHtml(text) {
    const div = document.createElement('div');
    div.textContent = text == null ? '' : String(text);
    return div.innerHTML;
}

function snippet(text, n) {
    return Array.from(text || '').slice(0, n).join('');
}

function formatPercent(score) {
    return (score * 100).toFixed(1) + '%';
}

function renderMetrics(metrics) {
    if (!metrics) {
        return '';
    }
    const parts = [];
    if (metrics.impact_factor != null) parts.push('Impact factor: ' + metrics.impact_factor);
    if (metrics.h_index != null) parts.push('H-index: ' + metrics.h_index);
    if (metrics.sjr != null) parts.push('SJR: ' + metrics.sjr);
    if (metrics.quartile) parts.push('Quartile: ' + metrics.quartile);
    if (metrics.publisher) parts.push('Publisher: ' + metrics.publisher);
    return '<div class="metrics">' +
        parts.map(p => '<span class="metric">' + escapeHtml(p) + '</span>').join('') +
        '</div>';
}

function renderResults(container, records) {
    if (!records.length) {
        container.innerHTML = '<p class="empty">No similar articles were found for this submission.</p>';
        return;
    }
    container.innerHTML = '<h2>Recommended journals</h2>' + records.map(record =>
        '<div class="result">' +
            '<h3>' + escapeHtml(record.journal) + '</h3>' +
            '<span class="score">' + formatPercent(record.similarity_score) + '</span>' +
            renderMetrics(record.metrics) +
            '<p class="match"><em>' + escapeHtml(record.title) + '</em></p>' +
            '<p class="snippet">' + escapeHtml(snippet(record.abstract, SNIPPET_CHARS)) + '</p>' +
        '</div>'
    ).join('');
}

document.addEventListener('DOMContentLoaded', () => {
    const form = document.getElementById('suggest-form');
    const results = document.getElementById('results');

    form.addEventListener('submit', async (event) => {
        event.preventDefault();
        const payload = {
            title: document.getElementById('title').value,
            abstract: document.getElementById('abstract').value,
            keywords: document.getElementById('keywords').value,
        };

        try {
            const response = await fetch('/api/recommend', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(payload),
            });
            if (!response.ok) {
                throw new Error('HTTP ' + response.status);
            }
            const records = await response.json();
            renderResults(results, records);
        } catch (error) {
            console.error('Recommendation request failed:', error);
            alert('Something went wrong while fetching recommendations. Please try again.');
        }
    });
});
"#;

const INDEX_BODY: &str = r#"<p>Paste your manuscript's title, abstract and keywords to find journals that publish similar work.</p>
<form id="suggest-form" method="post" action="/suggest">
    <label for="title">Title</label>
    <input id="title" name="title" type="text">
    <label for="abstract">Abstract</label>
    <textarea id="abstract" name="abstract"></textarea>
    <label for="keywords">Keywords</label>
    <input id="keywords" name="keywords" type="text">
    <button type="submit">Find journals</button>
</form>
<div id="results"></div>
"#;

/// Wraps `body` in the shared page layout. `title` must already be safe HTML.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Journal Recommender</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
<div class="container">
<h1>Journal Recommender</h1>
{body}
</div>
<script src="/static/app.js"></script>
</body>
</html>
"#
    )
}

pub async fn serve_index() -> impl IntoResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(page("Find a journal", INDEX_BODY)))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

pub async fn serve_css() -> impl IntoResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/css; charset=utf-8")
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(CSS))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

pub async fn serve_js() -> impl IntoResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/javascript; charset=utf-8")
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(JS))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
