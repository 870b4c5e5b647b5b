use axum::{extract::State, response::Html, routing::get, Router};
use serde_json::Value;

use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new().route("/blackliststatus", get(blacklist_page))
}

/// Proxy blacklist snapshot: a summary table for the top-level fields plus
/// the raw payload for anything nested.
async fn blacklist_page(State(state): State<AppState>) -> PageResult {
    let status = upstream::proxy::fetch_blacklist_status(&state)
        .await
        .map_err(|e| {
            PageError::with_hint(
                "Blacklist Status",
                "Check that the proxy admin endpoint and admin key are configured.",
                e,
            )
        })?;

    let summary = match &status {
        Value::Object(map) if !map.is_empty() => {
            let mut rows = String::new();
            for (key, value) in map {
                rows.push_str(&format!(
                    "          <tr><td>{}</td><td class=\"json-cell\">{}</td></tr>\n",
                    page::escape(key),
                    page::escape(&field_text(value)),
                ));
            }
            format!(
                r#"    <table>
      <thead><tr><th>Field</th><th>Value</th></tr></thead>
      <tbody>
{rows}      </tbody>
    </table>"#
            )
        }
        _ => r#"    <p class="message">The blacklist is currently empty.</p>"#.to_string(),
    };

    let raw = serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string());
    let body = format!(
        r#"    <h1>Blacklist Status</h1>
{summary}
    <h2 class="section-heading">Raw Response</h2>
    <pre class="raw-json">{raw}</pre>"#,
        raw = page::escape(&raw),
    );

    Ok(Html(page::document(
        "Blacklist Status",
        &[page::BASE_STYLE, page::TABLE_STYLE, BLACKLIST_STYLE],
        "",
        &body,
    )))
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(field_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

const BLACKLIST_STYLE: &str = r#"
.section-heading { padding: 0px 20px; }
.raw-json { margin: 20px; padding: 15px; background-color: #f5f5f5; border: 1px solid #ddd; border-radius: 4px; overflow-x: auto; font-size: 13px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrays_are_joined_for_display() {
        let value = json!(["1.2.3.4", "5.6.7.8"]);
        assert_eq!(field_text(&value), "1.2.3.4, 5.6.7.8");
    }

    #[test]
    fn scalars_render_plainly() {
        assert_eq!(field_text(&json!(3)), "3");
        assert_eq!(field_text(&json!("x")), "x");
    }
}
