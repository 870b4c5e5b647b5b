use axum::{extract::State, response::Html, routing::get, Router};
use chrono::{DateTime, Utc};

use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cachemap", get(cache_map_page))
        .route("/cacheddata", get(cached_data_page))
}

/// Raw dump of the cache server's map: key, params, value, resolve time.
async fn cache_map_page(State(state): State<AppState>) -> PageResult {
    let entries = upstream::cache::fetch_cache_map(&state)
        .await
        .map_err(|e| PageError::internal("Cache Map", e))?;
    if entries.is_empty() {
        return Ok(Html(page::empty_page(
            "Cache Map",
            "Cache Map",
            "The cache is currently empty.",
        )));
    }

    let mut rows = String::new();
    for (key, entry) in &entries {
        let method = key.split(':').next().unwrap_or(key);
        rows.push_str(&format!(
            "          <tr><td>{method}</td><td class=\"json-cell\">{params}</td><td class=\"json-cell\">{value}</td>{ts}</tr>\n",
            method = page::escape(method),
            params = page::escape(&entry.params.to_string()),
            value = page::escape(&entry.value.to_string()),
            ts = timestamp_cell(entry.timestamp),
        ));
    }

    let body = format!(
        r#"    <h1>Cache Map</h1>
    <p class="stats">{count} entries</p>
    <table id="cacheTable">
      <thead>
        <tr>
          <th data-sort="string">Key</th>
          <th data-sort="string">Params</th>
          <th data-sort="string">Value</th>
          <th data-sort="number">Timestamp</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#,
        count = entries.len(),
    );

    Ok(Html(page::document(
        "Cache Map",
        &[page::BASE_STYLE, page::TABLE_STYLE],
        &format!(
            "{}{}",
            page::sortable_script("cacheTable", 0, "asc"),
            LOCAL_TIME_SCRIPT,
        ),
        &body,
    )))
}

/// Curated view of the cache: method pulled off the key, entry age, and
/// long values behind a modal link.
async fn cached_data_page(State(state): State<AppState>) -> PageResult {
    let entries = upstream::cache::fetch_cache_map(&state)
        .await
        .map_err(|e| PageError::internal("Cached Data", e))?;
    if entries.is_empty() {
        return Ok(Html(page::empty_page(
            "Cached Data",
            "Cached Data",
            "The cache is currently empty.",
        )));
    }

    let now_ms = Utc::now().timestamp_millis();
    let char_limit = state.config.modal_char_limit;

    let mut rows = String::new();
    for (key, entry) in &entries {
        let method = key.split(':').next().unwrap_or(key);
        let age = entry.timestamp.map(|ts| now_ms - ts);
        rows.push_str(&format!(
            "          <tr><td>{method}</td><td class=\"json-cell\">{params}</td><td class=\"json-cell\">{value}</td>{ts}<td data-value=\"{age_value}\">{age}</td></tr>\n",
            method = page::escape(method),
            params = collapsible_cell(&entry.params.to_string(), "View params", char_limit),
            value = collapsible_cell(&entry.value.to_string(), "View full value", char_limit),
            ts = timestamp_cell(entry.timestamp),
            age_value = age.unwrap_or(i64::MAX),
            age = age.map_or_else(|| "null".to_string(), |a| format!("{a} ms")),
        ));
    }

    let body = format!(
        r#"    <h1>Cached Data</h1>
    <p class="stats">{count} entries</p>
    <table id="cachedDataTable">
      <thead>
        <tr>
          <th data-sort="string">Method</th>
          <th data-sort="string">Params</th>
          <th data-sort="string">Value</th>
          <th data-sort="number">Timestamp</th>
          <th data-sort="number">Age</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
{modal}
{modal_script}"#,
        count = entries.len(),
        modal = page::MODAL_MARKUP,
        modal_script = page::MODAL_SCRIPT,
    );

    Ok(Html(page::document(
        "Cached Data",
        &[page::BASE_STYLE, page::TABLE_STYLE, page::MODAL_STYLE],
        &format!(
            "{}{}",
            page::sortable_script("cachedDataTable", 4, "asc"),
            LOCAL_TIME_SCRIPT,
        ),
        &body,
    )))
}

/// Inline short text; long text becomes a modal link carrying the full
/// payload in a `data-object` attribute.
fn collapsible_cell(text: &str, link_label: &str, char_limit: usize) -> String {
    if text.chars().count() <= char_limit {
        return page::escape(text);
    }
    let preview: String = text.chars().take(char_limit).collect();
    format!(
        r#"{}&hellip; <a class="view-object-link" data-object="{}" onclick="showModalFrom(this)">{link_label}</a>"#,
        page::escape(&preview),
        page::escape(text),
    )
}

/// Timestamp cell carrying the raw epoch ms in `data-value` for numeric
/// sorting and for the client-side local-time rewrite; the server-rendered
/// UTC text stands in when scripts are disabled.
fn timestamp_cell(ms: Option<i64>) -> String {
    format!(
        r#"<td class="ts-cell" data-value="{}">{}</td>"#,
        ms.unwrap_or(0),
        format_millis(ms),
    )
}

fn format_millis(ms: Option<i64>) -> String {
    match ms.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "null".to_string(),
    }
}

/// Rewrite timestamp cells into the viewer's locale.
const LOCAL_TIME_SCRIPT: &str = r#"<script>
document.addEventListener('DOMContentLoaded', function() {
  document.querySelectorAll('td.ts-cell').forEach(td => {
    const ms = parseInt(td.getAttribute('data-value'), 10);
    if (ms > 0) { td.textContent = new Date(ms).toLocaleString(); }
  });
});
</script>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_values_render_inline() {
        let cell = collapsible_cell(&json!("0x10").to_string(), "View full value", 200);
        assert_eq!(cell, "&quot;0x10&quot;");
    }

    #[test]
    fn long_values_get_a_modal_link() {
        let cell = collapsible_cell(&json!("a".repeat(500)).to_string(), "View full value", 200);
        assert!(cell.contains("view-object-link"));
        assert!(cell.contains("data-object="));
        assert!(cell.contains("showModalFrom(this)"));
        assert!(cell.contains(">View full value</a>"));
    }

    #[test]
    fn missing_timestamps_render_null() {
        assert_eq!(format_millis(None), "null");
        assert!(format_millis(Some(1_700_000_000_000)).ends_with("UTC"));
    }

    #[test]
    fn timestamp_cell_carries_raw_millis_for_sorting() {
        let cell = timestamp_cell(Some(1_700_000_000_000));
        assert!(cell.contains(r#"class="ts-cell""#));
        assert!(cell.contains(r#"data-value="1700000000000""#));
        assert_eq!(timestamp_cell(None), r#"<td class="ts-cell" data-value="0">null</td>"#);
    }

    #[test]
    fn local_time_script_rewrites_from_data_value() {
        assert!(LOCAL_TIME_SCRIPT.contains("td.ts-cell"));
        assert!(LOCAL_TIME_SCRIPT.contains("toLocaleString()"));
    }
}
