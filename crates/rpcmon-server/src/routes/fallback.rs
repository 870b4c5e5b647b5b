use axum::{extract::State, response::Html, routing::get, Router};

use crate::render::page;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/fallbackurl", get(fallback_url_page))
}

/// Shows which RPC endpoint the proxy falls back to.
async fn fallback_url_page(State(state): State<AppState>) -> Html<String> {
    let url = if state.config.fallback_url.is_empty() {
        "(not configured)"
    } else {
        state.config.fallback_url.as_str()
    };
    let body = format!(
        r#"    <h1>Fallback URL</h1>
    <p class="message">PROXY TO:</p>
    <pre class="url">{}</pre>"#,
        page::escape(url),
    );
    Html(page::document(
        "Fallback URL",
        &[page::BASE_STYLE, FALLBACK_STYLE],
        "",
        &body,
    ))
}

const FALLBACK_STYLE: &str = r#"
.url { margin: 20px; padding: 15px; background-color: #f5f5f5; border: 1px solid #ddd; border-radius: 4px; font-size: 16px; }
"#;
