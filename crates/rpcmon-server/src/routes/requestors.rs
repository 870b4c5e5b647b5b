use axum::{extract::State, response::Html, routing::get, Router};

use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new().route("/requestortable", get(requestor_stats_page))
}

/// Per-origin request counters from the log aggregator, sortable, defaulting
/// to all-time volume.
async fn requestor_stats_page(State(state): State<AppState>) -> PageResult {
    let stats = upstream::logs::fetch_requestor_table(&state)
        .await
        .map_err(|e| PageError::internal("Requestor Stats", e))?;
    if stats.is_empty() {
        return Ok(Html(page::empty_page(
            "Requestor Stats",
            "Requestor Stats",
            "No requestor activity recorded yet.",
        )));
    }

    let mut rows = String::new();
    for (origin, s) in &stats {
        rows.push_str(&format!(
            "          <tr><td>{origin}</td>{}{}{}{}{}{}{}{}</tr>\n",
            num_cell(s.all_requests_all_time),
            num_cell(s.cache_requests_all_time),
            num_cell(s.pool_requests_all_time),
            num_cell(s.fallback_requests_all_time),
            num_cell(s.all_requests_last_week),
            num_cell(s.cache_requests_last_week),
            num_cell(s.pool_requests_last_week),
            num_cell(s.fallback_requests_last_week),
            origin = page::escape(origin),
        ));
    }

    let body = format!(
        r#"    <h1>Requestor Stats</h1>
    <p class="stats">{count} origins tracked</p>
    <table id="statsTable">
      <thead>
        <tr>
          <th data-sort="string">Origin</th>
          <th data-sort="number">All (All Time)</th>
          <th data-sort="number">Cache (All Time)</th>
          <th data-sort="number">Pool (All Time)</th>
          <th data-sort="number">Fallback (All Time)</th>
          <th data-sort="number">All (Last Week)</th>
          <th data-sort="number">Cache (Last Week)</th>
          <th data-sort="number">Pool (Last Week)</th>
          <th data-sort="number">Fallback (Last Week)</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#,
        count = stats.len(),
    );

    Ok(Html(page::document(
        "Requestor Stats",
        &[page::BASE_STYLE, page::TABLE_STYLE],
        &page::sortable_script("statsTable", 1, "desc"),
        &body,
    )))
}

fn num_cell(value: i64) -> String {
    format!("<td data-value=\"{value}\">{value}</td>")
}
