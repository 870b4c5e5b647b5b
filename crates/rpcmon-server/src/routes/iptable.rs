use std::collections::BTreeMap;

use axum::{extract::State, response::Html, routing::get, Router};
use serde_json::{Map, Value};

use crate::db;
use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/iptable", get(ip_table_page))
}

const IP_LIMIT: i64 = 100;

/// Per-IP request totals with an origin breakdown, busiest IPs first.
async fn ip_table_page(State(state): State<AppState>) -> PageResult {
    let totals = db::ip_history::ip_totals(&state.pool, IP_LIMIT)
        .await
        .map_err(|e| PageError::internal("IP Table", e))?;
    if totals.is_empty() {
        return Ok(Html(page::empty_page(
            "IP Request Table",
            "Requests by IP",
            "No request history recorded yet.",
        )));
    }

    let ips: Vec<String> = totals.iter().map(|t| t.ip.clone()).collect();
    let origin_rows = db::ip_history::ip_origin_counts(&state.pool, &ips)
        .await
        .map_err(|e| PageError::internal("IP Table", e))?;

    let mut origins_by_ip: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for row in origin_rows {
        origins_by_ip
            .entry(row.ip)
            .or_default()
            .insert(row.origin, Value::from(row.request_count));
    }

    let mut rows = String::new();
    for t in &totals {
        let origins = origins_by_ip
            .get(&t.ip)
            .map(|m| serde_json::to_string(&Value::Object(m.clone())).unwrap_or_default())
            .unwrap_or_else(|| "{}".to_string());
        let last_hour = t.requests_last_hour.unwrap_or(0);
        rows.push_str(&format!(
            "          <tr><td>{ip}</td><td class=\"json-cell\">{origins}</td><td data-value=\"{last_hour}\">{last_hour}</td><td data-value=\"{total}\">{total}</td></tr>\n",
            ip = page::escape(&t.ip),
            origins = page::escape(&origins),
            total = t.total_requests,
        ));
    }

    let body = format!(
        r#"    <h1>Requests by IP</h1>
    <p class="stats">{count} IPs tracked</p>
    <table id="ipTable">
      <thead>
        <tr>
          <th data-sort="string">IP Address</th>
          <th data-sort="string">Origins</th>
          <th data-sort="number">Requests Last Hour</th>
          <th data-sort="number">Requests Total</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#,
        count = totals.len(),
    );

    Ok(Html(page::document(
        "IP Request Table",
        &[page::BASE_STYLE, page::TABLE_STYLE],
        &page::sortable_script("ipTable", 3, "desc"),
        &body,
    )))
}
