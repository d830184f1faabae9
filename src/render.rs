//! Server-side HTML for the form fallback route.

use crate::config::Number;
use crate::recommend::Recommendations;
use crate::static_files::page;

/// The first `max_chars` characters of `text` (characters, not bytes).
pub fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Score in `[0, 1]` as a percentage with one decimal, e.g. `87.3%`.
pub fn format_percent(score: Number) -> String {
    format!("{:.1}%", score as f64 * 100.0)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn metric<T: std::fmt::Display>(label: &str, value: Option<T>) -> String {
    match value {
        Some(v) => format!(
            "<span class=\"metric\">{}: {}</span>",
            label,
            escape_html(&v.to_string())
        ),
        None => String::new(),
    }
}

pub fn render_results(recommendations: &Recommendations, snippet_chars: usize) -> String {
    let mut body = String::new();
    body.push_str("<h2>Recommended journals</h2>\n");

    if recommendations.journals.is_empty() {
        body.push_str("<p class=\"empty\">No similar articles were found for this submission.</p>\n");
    } else {
        body.push_str("<ol class=\"journals\">\n");
        for rec in &recommendations.journals {
            body.push_str("<li class=\"result\">");
            body.push_str(&format!(
                "<h3>{}</h3><span class=\"score\">{}</span>",
                escape_html(&rec.journal),
                format_percent(rec.similarity())
            ));
            if let Some(j) = &rec.metrics {
                body.push_str("<div class=\"metrics\">");
                body.push_str(&metric("Impact factor", j.impact_factor));
                body.push_str(&metric("H-index", j.h_index));
                body.push_str(&metric("SJR", j.sjr));
                body.push_str(&metric("Quartile", j.quartile.as_deref()));
                body.push_str(&metric("Publisher", j.publisher.as_deref()));
                body.push_str(&metric("Articles", Some(j.article_count)));
                body.push_str(&metric(
                    "Mean citations",
                    j.mean_citations.map(|m| format!("{:.1}", m)),
                ));
                body.push_str("</div>");
            }
            body.push_str(&format!(
                "<p class=\"match\">Closest article: <em>{}</em></p><p class=\"snippet\">{}</p>",
                escape_html(&rec.article.title),
                escape_html(&snippet(&rec.article.abstract_text, snippet_chars))
            ));
            body.push_str("</li>\n");
        }
        body.push_str("</ol>\n");
    }

    if !recommendations.articles.is_empty() {
        body.push_str("<h2>Similar articles</h2>\n<ol class=\"articles\">\n");
        for article in &recommendations.articles {
            body.push_str(&format!(
                "<li><span class=\"title\">{}</span> <span class=\"journal\">{}</span> <span class=\"score\">{}</span></li>\n",
                escape_html(&article.title),
                escape_html(&article.journal),
                format_percent(article.similarity)
            ));
        }
        body.push_str("</ol>\n");
    }

    body.push_str("<p><a href=\"/\">New search</a></p>\n");
    page("Recommendations", &body)
}
