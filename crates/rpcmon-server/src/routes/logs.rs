use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use rpcmon_common::classify::{classify, LogClass};
use rpcmon_common::models::LogRecord;
use rpcmon_common::paging;

use crate::render::{page, table};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new().route("/logs", get(logs_page))
}

#[derive(Deserialize)]
struct LogsQuery {
    page: Option<usize>,
    filter: Option<String>,
    /// Set on AJAX refreshes; names the table being re-rendered.
    table: Option<String>,
}

/// Partial re-render payload for one table.
#[derive(Serialize)]
struct TableFragment {
    tbody: String,
    pagination: String,
}

async fn logs_page(State(state): State<AppState>, Query(query): Query<LogsQuery>) -> Response {
    let (fallback_logs, cache_logs) = tokio::join!(
        upstream::logs::fetch_logs(&state, "/fallbackRequests"),
        upstream::logs::fetch_logs(&state, "/cacheRequests"),
    );

    let current = query.page.unwrap_or(1).max(1);
    let filter = query.filter.as_deref().unwrap_or("all");
    let per_page = state.config.log_items_per_page;
    let ignored = &state.config.ignored_error_codes;

    let fallback_logs = apply_filter(fallback_logs, filter);
    let cache_logs = apply_filter(cache_logs, filter);

    // AJAX refresh: just the rows and pagination for the requested table.
    if let Some(table_id) = query.table.as_deref() {
        let records = if table_id == "fallbackLogs" {
            &fallback_logs
        } else {
            &cache_logs
        };
        let fragment = TableFragment {
            tbody: render_rows(records, current, per_page, ignored),
            pagination: table::pagination_bar(
                current,
                paging::total_pages(records.len(), per_page),
                table_id,
            ),
        };
        return Json(fragment).into_response();
    }

    let body = format!(
        r#"    <h1>RPC Request Logs</h1>
{}
{}
{}"#,
        render_table(
            "fallbackLogs",
            "Fallback Request Logs",
            &fallback_logs,
            current,
            per_page,
            filter,
            ignored,
        ),
        render_table(
            "cacheLogs",
            "Cache Request Logs",
            &cache_logs,
            current,
            per_page,
            filter,
            ignored,
        ),
        LOGS_SCRIPT,
    );

    Html(page::document(
        "RPC Logs",
        &[page::BASE_STYLE, page::TABLE_STYLE, page::PAGINATION_STYLE, LOGS_STYLE],
        "",
        &body,
    ))
    .into_response()
}

/// Narrow the record list to a status filter. `success` keeps records whose
/// status is `success` ignoring case; `error` keeps everything else.
fn apply_filter(records: Vec<LogRecord>, filter: &str) -> Vec<LogRecord> {
    match filter {
        "success" => records
            .into_iter()
            .filter(|r| r.status.to_lowercase() == "success")
            .collect(),
        "error" => records
            .into_iter()
            .filter(|r| r.status.to_lowercase() != "success")
            .collect(),
        _ => records,
    }
}

fn render_table(
    table_id: &str,
    title: &str,
    records: &[LogRecord],
    current: usize,
    per_page: usize,
    filter: &str,
    ignored: &[i64],
) -> String {
    let total = paging::total_pages(records.len(), per_page);
    let mut buttons = String::new();
    for (value, label) in [("all", "All"), ("success", "Success"), ("error", "Errors")] {
        let active = if value == filter { " active" } else { "" };
        buttons.push_str(&format!(
            r#"<button class="filter-btn{active}" data-filter="{value}" onclick="filterLogs('{table_id}', '{value}')">{label}</button>"#
        ));
    }

    format!(
        r#"    <div class="log-section" id="{table_id}">
      <h2>{title} ({count} total entries)</h2>
      <div class="filter-buttons">{buttons}</div>
      <table>
        <thead>
          <tr><th>Timestamp</th><th>Origin</th><th>Method</th><th>Params</th><th>Duration (ms)</th><th>Status</th></tr>
        </thead>
        <tbody id="{table_id}-body">
{rows}        </tbody>
      </table>
      <div id="{table_id}-pagination">{pagination}</div>
    </div>"#,
        count = records.len(),
        rows = render_rows(records, current, per_page, ignored),
        pagination = table::pagination_bar(current, total, table_id),
    )
}

/// The rows for one page of a log table, newest first, each row tinted by
/// its status classification.
fn render_rows(records: &[LogRecord], current: usize, per_page: usize, ignored: &[i64]) -> String {
    let (start, end) = paging::page_bounds(current, per_page, records.len());
    let mut rows = String::new();
    for record in &records[start..end] {
        let class = classify(&record.status, ignored);
        let row_class = match class {
            LogClass::Success | LogClass::Ignored => String::new(),
            _ => format!(r#" class="{}""#, class.css_class()),
        };
        rows.push_str(&format!(
            "          <tr{row_class}><td>{ts}</td><td>{origin}</td><td>{method}</td><td class=\"json-cell\">{params}</td><td>{duration}</td><td>{status}</td></tr>\n",
            ts = record.timestamp,
            origin = page::escape(&record.origin),
            method = page::escape(&record.method),
            params = page::escape(&record.params),
            duration = record.duration_ms,
            status = page::escape(&record.status),
        ));
    }
    rows
}

const LOGS_STYLE: &str = r#"
.log-section { padding: 0px 20px; margin-bottom: 40px; }
"#;

/// Client side of the AJAX refresh: `changePage` and `filterLogs` re-fetch
/// just the affected table's rows and pagination.
const LOGS_SCRIPT: &str = r#"<script>
const pageState = {
  fallbackLogs: { page: 1, filter: 'all' },
  cacheLogs: { page: 1, filter: 'all' }
};

async function changePage(tableId, page) {
  pageState[tableId].page = page;
  await refreshTable(tableId);
}

async function filterLogs(tableId, filter) {
  pageState[tableId].page = 1;
  pageState[tableId].filter = filter;
  document.querySelectorAll('#' + tableId + ' .filter-btn').forEach(btn => {
    btn.classList.toggle('active', btn.getAttribute('data-filter') === filter);
  });
  await refreshTable(tableId);
}

async function refreshTable(tableId) {
  const s = pageState[tableId];
  try {
    const response = await fetch('/logs?page=' + s.page + '&filter=' + s.filter + '&table=' + tableId);
    const data = await response.json();
    document.getElementById(tableId + '-body').innerHTML = data.tbody;
    document.getElementById(tableId + '-pagination').innerHTML = data.pagination;
  } catch (err) {
    console.error('Failed to refresh ' + tableId, err);
  }
}
</script>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> LogRecord {
        LogRecord {
            timestamp: 1_700_000_000_000,
            origin: "dapp.example.org".to_string(),
            method: "eth_call".to_string(),
            params: "[]".to_string(),
            duration_ms: 12,
            status: status.to_string(),
        }
    }

    #[test]
    fn success_filter_is_case_insensitive() {
        let records = vec![record("success"), record("Success"), record("timeout")];
        let kept = apply_filter(records, "success");
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn error_filter_keeps_everything_not_successful() {
        let records = vec![record("success"), record("timeout"), record(r#"{"code":-32000}"#)];
        let kept = apply_filter(records, "error");
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn rows_are_clipped_to_the_requested_page() {
        let records: Vec<LogRecord> = (0..5).map(|_| record("success")).collect();
        let rows = render_rows(&records, 2, 3, &[]);
        assert_eq!(rows.matches("<tr").count(), 2);
    }

    #[test]
    fn warning_rows_are_tinted() {
        let rows = render_rows(&[record("upstream timeout")], 1, 30, &[]);
        assert!(rows.contains(r#"class="status-warning""#));
    }

    #[test]
    fn params_are_escaped() {
        let mut r = record("success");
        r.params = "<script>".to_string();
        let rows = render_rows(&[r], 1, 30, &[]);
        assert!(rows.contains("&lt;script&gt;"));
        assert!(!rows.contains("<script>"));
    }
}
